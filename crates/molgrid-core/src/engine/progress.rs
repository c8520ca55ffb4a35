/// Events emitted while a loader or workflow runs, for front ends that draw progress.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// A batch has been assembled; `epoch` counts completed passes over the index.
    BatchReady { batch: u64, epoch: u64 },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `steps` calls of `step`, bracketed by task start/finish events and one increment
    /// per call. Stops at the first error.
    pub fn task<T, E>(
        &self,
        steps: usize,
        mut step: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<Vec<T>, E> {
        self.report(Progress::TaskStart {
            total_steps: steps as u64,
        });
        let mut results = Vec::with_capacity(steps);
        for i in 0..steps {
            results.push(step(i)?);
            self.report(Progress::TaskIncrement);
        }
        self.report(Progress::TaskFinish);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn task_reports_each_step() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(format!("{:?}", event));
        }));

        let squares: Result<Vec<usize>, ()> = reporter.task(3, |i| Ok(i * i));
        assert_eq!(squares.unwrap(), vec![0, 1, 4]);
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], "TaskStart { total_steps: 3 }");
        assert_eq!(events[4], "TaskFinish");
    }

    #[test]
    fn task_stops_on_error() {
        let reporter = ProgressReporter::new();
        let result: Result<Vec<usize>, &str> =
            reporter.task(5, |i| if i == 2 { Err("boom") } else { Ok(i) });
        assert_eq!(result, Err("boom"));
    }
}
