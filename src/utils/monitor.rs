use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Narration volume and wall time of one finished lesson.
#[derive(Debug, Clone)]
struct LessonSample {
    lesson: String,
    lines: usize,
    elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub lessons: usize,
    pub total_lines: usize,
    pub busiest: Option<(String, usize)>,
    pub slowest: Option<(String, Duration)>,
    pub peak_memory_mb: Option<u64>,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
struct ProcessSampler {
    system: sysinfo::System,
    pid: sysinfo::Pid,
}

#[cfg(feature = "cli")]
impl ProcessSampler {
    fn new() -> Option<Self> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("Unable to resolve current PID, memory sampling disabled: {}", e);
                return None;
            }
        };
        Some(Self {
            system: sysinfo::System::new_with_specifics(sysinfo::RefreshKind::everything()),
            pid,
        })
    }

    /// Resident memory in MiB and CPU usage of this process.
    fn sample(&mut self) -> Option<(u64, f32)> {
        self.system.refresh_all();
        let process = self.system.process(self.pid)?;
        Some((process.memory() / 1024 / 1024, process.cpu_usage()))
    }
}

#[cfg(not(feature = "cli"))]
struct ProcessSampler;

#[cfg(not(feature = "cli"))]
impl ProcessSampler {
    fn new() -> Option<Self> {
        Some(Self)
    }

    fn sample(&mut self) -> Option<(u64, f32)> {
        None
    }
}

struct MonitorState {
    sampler: Option<ProcessSampler>,
    samples: Vec<LessonSample>,
    peak_memory_mb: Option<u64>,
    started: Instant,
}

impl MonitorState {
    fn sample_process(&mut self) -> Option<(u64, f32)> {
        let (memory_mb, cpu) = self.sampler.as_mut()?.sample()?;
        self.peak_memory_mb = Some(self.peak_memory_mb.map_or(memory_mb, |peak| peak.max(memory_mb)));
        Some((memory_mb, cpu))
    }

    fn stats(&self) -> RunStats {
        RunStats {
            lessons: self.samples.len(),
            total_lines: self.samples.iter().map(|s| s.lines).sum(),
            busiest: self
                .samples
                .iter()
                .max_by_key(|s| s.lines)
                .map(|s| (s.lesson.clone(), s.lines)),
            slowest: self
                .samples
                .iter()
                .max_by_key(|s| s.elapsed)
                .map(|s| (s.lesson.clone(), s.elapsed)),
            peak_memory_mb: self.peak_memory_mb,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Per-lesson run statistics. Disabled monitors record nothing.
pub struct LessonMonitor {
    state: Option<Mutex<MonitorState>>,
}

impl LessonMonitor {
    pub fn new(enabled: bool) -> Self {
        let state = enabled.then(|| {
            Mutex::new(MonitorState {
                sampler: ProcessSampler::new(),
                samples: Vec::new(),
                peak_memory_mb: None,
                started: Instant::now(),
            })
        });
        Self { state }
    }

    /// Clears earlier samples and logs the baseline footprint.
    pub fn begin(&self, lessons: usize) {
        let Some(mut state) = self.lock() else {
            return;
        };
        state.samples.clear();
        state.peak_memory_mb = None;
        state.started = Instant::now();
        match state.sample_process() {
            Some((memory_mb, _)) => {
                tracing::info!("📊 Monitoring {} lesson(s), baseline memory {}MB", lessons, memory_mb)
            }
            None => tracing::info!("📊 Monitoring {} lesson(s)", lessons),
        }
    }

    pub fn record_lesson(&self, lesson: &str, lines: usize, elapsed: Duration) {
        let Some(mut state) = self.lock() else {
            return;
        };
        match state.sample_process() {
            Some((memory_mb, cpu)) => tracing::info!(
                "📊 {} - {} lines in {:?} ({:.0} lines/s), Memory: {}MB, CPU: {:.1}%",
                lesson,
                lines,
                elapsed,
                lines_per_second(lines, elapsed),
                memory_mb,
                cpu
            ),
            None => tracing::info!(
                "📊 {} - {} lines in {:?} ({:.0} lines/s)",
                lesson,
                lines,
                elapsed,
                lines_per_second(lines, elapsed)
            ),
        }
        state.samples.push(LessonSample {
            lesson: lesson.to_string(),
            lines,
            elapsed,
        });
    }

    /// Summarises the recorded lessons and logs the totals.
    pub fn finish(&self) -> Option<RunStats> {
        let stats = self.lock()?.stats();
        tracing::info!(
            "📊 Final Stats - {} lesson(s), {} lines narrated, Total Time: {:?}",
            stats.lessons,
            stats.total_lines,
            stats.elapsed
        );
        if let Some((lesson, lines)) = &stats.busiest {
            tracing::info!("📊 Most narrated lesson: {} ({} lines)", lesson, lines);
        }
        if let Some((lesson, elapsed)) = &stats.slowest {
            tracing::info!("📊 Slowest lesson: {} ({:?})", lesson, elapsed);
        }
        if let Some(peak) = stats.peak_memory_mb {
            tracing::info!("📊 Peak Memory: {}MB", peak);
        }
        Some(stats)
    }

    fn lock(&self) -> Option<std::sync::MutexGuard<'_, MonitorState>> {
        self.state.as_ref()?.lock().ok()
    }
}

impl Default for LessonMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

fn lines_per_second(lines: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        lines as f64 / seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = LessonMonitor::new(false);
        monitor.begin(1);
        monitor.record_lesson("fibonacci", 40, Duration::from_millis(3));
        assert!(monitor.finish().is_none());
    }

    #[test]
    fn test_stats_pick_busiest_and_slowest_lessons() {
        let monitor = LessonMonitor::new(true);
        monitor.begin(3);
        monitor.record_lesson("fibonacci", 120, Duration::from_millis(2));
        monitor.record_lesson("stack-hello", 15, Duration::from_millis(1));
        monitor.record_lesson("stack-overflow", 80, Duration::from_millis(9));

        let stats = monitor.finish().unwrap();
        assert_eq!(stats.lessons, 3);
        assert_eq!(stats.total_lines, 215);
        assert_eq!(stats.busiest, Some(("fibonacci".to_string(), 120)));
        assert_eq!(
            stats.slowest,
            Some(("stack-overflow".to_string(), Duration::from_millis(9)))
        );
    }

    #[test]
    fn test_begin_clears_previous_run() {
        let monitor = LessonMonitor::new(true);
        monitor.begin(1);
        monitor.record_lesson("fibonacci", 10, Duration::from_millis(1));
        monitor.begin(1);
        assert_eq!(monitor.finish().map(|stats| stats.total_lines), Some(0));
    }

    #[test]
    fn test_lines_per_second() {
        assert_eq!(lines_per_second(50, Duration::from_millis(500)), 100.0);
        assert_eq!(lines_per_second(50, Duration::ZERO), 0.0);
    }
}
