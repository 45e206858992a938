//! Visual state for the loading / content / error areas
//!
//! Three independent toggles. They are only changed through the
//! transition methods below, which keep them coherent.

/// Visibility of the three main display areas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Loading indicator visible
    pub loading: bool,
    /// Content area (moon + data sections) visible
    pub content: bool,
    /// Error banner text, visible when set
    pub error: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show loading, clear any previous error, hide content
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
        self.content = false;
    }

    /// Hide loading and show content
    pub fn finish_success(&mut self) {
        self.loading = false;
        self.content = true;
    }

    /// Hide loading and show the error banner
    pub fn finish_failure(&mut self, message: String) {
        self.loading = false;
        self.content = false;
        self.error = Some(message);
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }
}
