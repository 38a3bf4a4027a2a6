//! Structure rendering: classified lines to nested HTML blocks.
//!
//! The renderer is a small state machine (idle, in a section, in a list) held
//! in [`RenderState`]. An open `<ul>` is always closed before any other block
//! is emitted, on a blank line, and at end of input, so the output never
//! carries an unbalanced list.

use std::fmt::Write;

use crate::classify::{ClassifiedLine, LineClassifier, LineKind};
use crate::profile::FormattingProfile;

/// Per-entry renderer state. Created fresh for every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    /// A `<ul>` has been opened and not yet closed.
    pub open_list: bool,
    /// Letter of the most recent section header.
    pub current_section: Option<char>,
    /// Workout type announced since the last section header.
    pub current_workout_type: Option<String>,
}

impl RenderState {
    /// Whether a section header has been seen.
    #[must_use]
    pub fn in_section(&self) -> bool {
        self.current_section.is_some()
    }

    /// Apply one classified line, appending the HTML it produces to `out`.
    pub fn apply(&mut self, line: &ClassifiedLine, out: &mut String) {
        if line.kind != LineKind::ListItem {
            self.close_list(out);
        }

        let text = html_escape(&line.text);
        match line.kind {
            LineKind::Blank => {}
            LineKind::SectionHeader => {
                let letter = line.section_letter.unwrap_or('?');
                self.current_section = Some(letter);
                self.current_workout_type = None;
                push_block(
                    out,
                    format_args!(r#"<div class="section-header">{letter}) {text}</div>"#),
                );
            }
            LineKind::WorkoutType => {
                self.current_workout_type = Some(line.text.clone());
                push_block(out, format_args!(r#"<div class="workout-type">{text}</div>"#));
            }
            LineKind::ListItem => {
                if !self.open_list {
                    self.open_list = true;
                    push_block(out, format_args!(r#"<ul class="wod-list">"#));
                }
                push_block(out, format_args!("<li>{text}</li>"));
            }
            LineKind::SubSection => {
                let class = if self.current_workout_type.is_some() {
                    "workout-details"
                } else {
                    "subsection"
                };
                push_block(out, format_args!(r#"<div class="{class}">{text}</div>"#));
            }
            LineKind::Paragraph => {
                push_block(out, format_args!(r#"<p class="wod-paragraph">{text}</p>"#));
            }
        }
    }

    /// Close any open list. Called at end of input.
    pub fn finish(&mut self, out: &mut String) {
        self.close_list(out);
    }

    fn close_list(&mut self, out: &mut String) {
        if self.open_list {
            self.open_list = false;
            push_block(out, format_args!("</ul>"));
        }
    }
}

/// Renders the plain text of one entry into an HTML fragment.
#[derive(Debug, Clone, Copy)]
pub struct StructureRenderer {
    classifier: LineClassifier,
}

impl StructureRenderer {
    /// Create a renderer around a classifier.
    #[must_use]
    pub const fn new(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    /// Renderer for a profile.
    #[must_use]
    pub const fn for_profile(profile: &FormattingProfile) -> Self {
        Self::new(LineClassifier::for_profile(profile))
    }

    /// Render a sequence of lines. State lives only for this call.
    pub fn render<'a, I>(&self, lines: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut state = RenderState::default();
        let mut out = String::new();

        for line in lines {
            let classified = self.classifier.classify(line, &state);
            state.apply(&classified, &mut out);
        }
        state.finish(&mut out);

        out
    }

    /// Render newline-delimited text.
    pub fn render_text(&self, text: &str) -> String {
        self.render(text.lines())
    }
}

fn push_block(out: &mut String, block: std::fmt::Arguments<'_>) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = out.write_fmt(block);
}

/// Simple HTML escaping for text placed inside markup.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
