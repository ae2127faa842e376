use crate::history::log::HistoryLog;

/// State owned by one user session.
#[derive(Debug, Default)]
pub struct Session {
    pub history: HistoryLog,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: HistoryLog::new(),
        }
    }
}
