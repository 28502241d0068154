//! Clipboard access for the summary view.
//!
//! Copying tries the system clipboard first and falls back to an OSC 52
//! escape sequence, which most terminals honour even over SSH. Failure of
//! both is reported as `false`, never as a panic.

use std::io::Write;

use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard failed: {0}")]
    System(String),
    #[error("OSC 52 clipboard failed: {0}")]
    Osc52(#[from] std::io::Error),
}

/// What the rest of the app sees: copy some text, learn whether it worked.
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> bool;
}

/// One way of getting text onto the clipboard.
pub trait CopyTransport {
    fn name(&self) -> &'static str;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Tries `primary`, then `fallback`. The caller does not learn which one won.
pub struct FallbackClipboard<P, F> {
    primary: P,
    fallback: F,
}

impl<P: CopyTransport, F: CopyTransport> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: CopyTransport, F: CopyTransport> Clipboard for FallbackClipboard<P, F> {
    fn copy_text(&mut self, text: &str) -> bool {
        match self.primary.write_text(text) {
            Ok(()) => {
                tracing::debug!(transport = self.primary.name(), "summary copied");
                return true;
            }
            Err(e) => {
                tracing::debug!(transport = self.primary.name(), error = %e, "primary copy failed");
            }
        }

        match self.fallback.write_text(text) {
            Ok(()) => {
                tracing::debug!(transport = self.fallback.name(), "summary copied");
                true
            }
            Err(e) => {
                tracing::warn!(transport = self.fallback.name(), error = %e, "all clipboard transports failed");
                false
            }
        }
    }
}

/// System clipboard via `arboard`.
#[derive(Default)]
pub struct SystemTransport;

impl CopyTransport for SystemTransport {
    fn name(&self) -> &'static str {
        "system"
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::System(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::System(e.to_string()))
    }
}

/// OSC 52 escape sequence written to the terminal, which copies on our behalf.
pub struct Osc52Transport<W: Write> {
    out: W,
}

impl<W: Write> Osc52Transport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl Osc52Transport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> CopyTransport for Osc52Transport<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        // ESC ] 52 ; c ; <base64> ESC \
        write!(self.out, "\x1b]52;c;{encoded}\x1b\\")?;
        self.out.flush()?;
        Ok(())
    }
}

pub type SystemClipboard = FallbackClipboard<SystemTransport, Osc52Transport<std::io::Stdout>>;

impl SystemClipboard {
    pub fn system() -> Self {
        FallbackClipboard::new(SystemTransport, Osc52Transport::stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTransport {
        fail: bool,
        writes: Vec<String>,
    }

    impl FakeTransport {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                writes: Vec::new(),
            }
        }
    }

    impl CopyTransport for FakeTransport {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.writes.push(text.to_string());
            if self.fail {
                Err(ClipboardError::System("denied".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let mut clip = FallbackClipboard::new(FakeTransport::new(false), FakeTransport::new(false));
        assert!(clip.copy_text("hello"));
        assert_eq!(clip.primary.writes, vec!["hello"]);
        assert!(clip.fallback.writes.is_empty());
    }

    #[test]
    fn test_primary_failure_uses_fallback() {
        let mut clip = FallbackClipboard::new(FakeTransport::new(true), FakeTransport::new(false));
        assert!(clip.copy_text("hello"));
        assert_eq!(clip.fallback.writes, vec!["hello"]);
    }

    #[test]
    fn test_double_failure_returns_false() {
        let mut clip = FallbackClipboard::new(FakeTransport::new(true), FakeTransport::new(true));
        assert!(!clip.copy_text("hello"));
        assert_eq!(clip.primary.writes.len(), 1);
        assert_eq!(clip.fallback.writes.len(), 1);
    }

    #[test]
    fn test_osc52_sequence() {
        let mut transport = Osc52Transport::new(Vec::new());
        transport.write_text("AA8: 2 CBU TERM").unwrap();
        let written = String::from_utf8(transport.out).unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode("AA8: 2 CBU TERM");
        assert_eq!(written, format!("\x1b]52;c;{encoded}\x1b\\"));
    }
}
