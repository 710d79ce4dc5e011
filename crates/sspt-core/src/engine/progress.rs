#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    PathwayFailed { pathway: String, reason: String },
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

    /// Reports `PhaseStart` now and `PhaseFinish` when the returned guard is dropped,
    /// including on early returns through `?`.
    pub(crate) fn phase(&self, name: &'static str) -> PhaseGuard<'_, 'a> {
        self.report(Progress::PhaseStart { name });
        PhaseGuard { reporter: self }
    }
}

pub(crate) struct PhaseGuard<'r, 'a> {
    reporter: &'r ProgressReporter<'a>,
}

impl Drop for PhaseGuard<'_, '_> {
    fn drop(&mut self) {
        self.reporter.report(Progress::PhaseFinish);
    }
}
