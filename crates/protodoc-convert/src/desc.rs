//! Comment cleanup and description derivation.
//!
//! Leading comments arrive as raw text with the comment markers already
//! removed. [`clean`] normalizes their whitespace; [`Description`] derives
//! the long form used for messages, enums, services and endpoints and the
//! one-sentence short form used for fields and enum values.

/// Marker that flags a deprecated declaration inside its comment.
const DEPRECATED: &str = "Deprecated: ";

/// Normalizes comment whitespace.
///
/// Runs of spaces and tabs collapse to one space. A single line break
/// becomes a space, two or more become a paragraph break (`"\n\n"`).
/// Leading and trailing whitespace is dropped.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0_usize;
    let mut whitespace = false;
    for c in text.chars() {
        if c == '\n' || c == '\u{2028}' {
            newlines += 1;
            continue;
        }
        if c.is_whitespace() {
            whitespace = true;
            continue;
        }
        if !out.is_empty() {
            match newlines {
                0 if whitespace => out.push(' '),
                0 => {}
                1 => out.push(' '),
                _ => out.push_str("\n\n"),
            }
        }
        newlines = 0;
        whitespace = false;
        out.push(c);
    }
    out
}

/// A cleaned declaration comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    text: String,
}

impl Description {
    /// Cleans a raw leading comment.
    pub fn parse(raw: &str) -> Self {
        Self { text: clean(raw) }
    }

    /// Returns the cleaned text, unchanged otherwise.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the description with the declaration's own name removed.
    ///
    /// Comments conventionally open with the name being documented
    /// (`"Invoice is a bill sent to a customer."`). The leading
    /// `"<name> is "`, `"<name> are "` or `"<name> "` is stripped and the
    /// remainder starts with a capital letter.
    pub fn long(&self, name: &str) -> String {
        let text = self.text.replace(DEPRECATED, "");
        let mut rest = text.as_str();
        for prefix in [format!("{name} is "), format!("{name} are ")] {
            rest = rest.strip_prefix(prefix.as_str()).unwrap_or(rest);
        }
        rest = rest
            .strip_prefix(name)
            .and_then(|r| r.strip_prefix(' '))
            .unwrap_or(rest);

        let mut chars = rest.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Returns the first sentence of [`Description::long`] without its
    /// trailing period.
    pub fn short(&self, name: &str) -> String {
        let long = self.long(name);
        let sentence = first_sentence(&long);
        sentence.strip_suffix('.').unwrap_or(sentence).to_owned()
    }
}

/// Returns the first sentence of cleaned text.
///
/// A sentence ends at the first paragraph break, or at a period followed
/// by a space unless the period closes a single capital letter
/// (`"U.S. "`, `"A. Smith"`).
fn first_sentence(text: &str) -> &str {
    let text = text.split("\n\n").next().unwrap_or_default();
    let (mut before_prev, mut prev, mut last) = ('x', 'x', 'x');
    for (i, c) in text.char_indices() {
        if c == ' '
            && last == '.'
            && (!prev.is_uppercase() || before_prev.is_uppercase())
        {
            return &text[..i];
        }
        before_prev = prev;
        prev = last;
        last = c;
    }
    text
}
