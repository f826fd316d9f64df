use std::fmt::Display;

use console::{style, StyledObject};

/// View and pipeline names heading a section.
pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

/// Component name above its table.
pub fn title(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().bold()
}

pub fn muted(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn count(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

/// Name of a component that could not be built.
pub fn skipped(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn problem(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn brand(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_keep_the_text() {
        for styled in [
            heading("Releases"),
            title("Releases"),
            muted("Releases"),
            count("Releases"),
            skipped("Releases"),
            problem("Releases"),
            brand("Releases"),
        ] {
            assert!(styled.to_string().contains("Releases"));
        }
    }
}
