use std::fmt;

use tracing::{event, Level};

/// User-facing failure messages raised by the cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartNotice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl CartNotice {
    pub fn message(&self) -> &'static str {
        match self {
            CartNotice::OutOfStock => "Quantidade solicitada fora de estoque",
            CartNotice::AddFailed => "Erro na adição do produto",
            CartNotice::RemoveFailed => "Erro na remoção do produto",
            CartNotice::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for error messages meant for the shopper.
pub trait Notifier {
    fn error(&self, message: &str);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        event!(Level::ERROR, notice = message, "cart notification");
    }
}
