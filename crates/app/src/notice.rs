//! Notices — one-shot messages shown on top of the page until dismissed.

/// How a notice is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Tailwind classes for the notice banner.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "bg-blue-50 text-blue-800 border-blue-300",
            NoticeLevel::Error => "bg-red-50 text-red-800 border-red-300",
        }
    }
}
