// File: ./src/haptics.rs
// Fire-and-forget feedback sink. The platform decides what a "haptic" is.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Success,
    Warning,
    Error,
    ImpactLight,
    ImpactMedium,
}

pub trait HapticSink {
    fn emit(&mut self, kind: HapticKind);
}

/// Keeps every signal in order. Handy for tests and for status-line feedback.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub emitted: Vec<HapticKind>,
}

impl HapticSink for Recorder {
    fn emit(&mut self, kind: HapticKind) {
        self.emitted.push(kind);
    }
}

impl Recorder {
    pub fn take(&mut self) -> Vec<HapticKind> {
        std::mem::take(&mut self.emitted)
    }

    pub fn last(&self) -> Option<HapticKind> {
        self.emitted.last().copied()
    }
}
