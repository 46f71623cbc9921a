//! Static 404 page for unknown routes.

use std::fmt;

#[derive(Clone, Copy, Debug, Default)]
pub struct NotFoundPage;

impl NotFoundPage {
    pub const CODE: &'static str = "404";
    pub const MESSAGE: &'static str = "Sorry! Page not found";
}

impl fmt::Display for NotFoundPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Self::CODE)?;
        write!(f, "{}", Self::MESSAGE)
    }
}
