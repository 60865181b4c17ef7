//! References section reshaping
//!
//! Active only between the "References" heading and the next heading. Each
//! `[id]` line opens a reference definition and is rewritten to the explicit
//! `.. [id]` target form; following lines are continuations, indented to
//! align under the definition above.

/// Ordered set of reference identifiers seen inside the References section,
/// plus the most recently opened one (which fixes continuation indentation).
#[derive(Debug, Default)]
pub struct ReferenceTable {
    ids: Vec<String>,
    last_id: String,
}

impl ReferenceTable {
    pub fn new() -> Self {
        ReferenceTable::default()
    }

    pub fn record(&mut self, id: &str) {
        self.ids.push(id.to_string());
        self.last_id = id.to_string();
    }

    /// Leaving the references section forgets the open definition.
    pub fn reset_last(&mut self) {
        self.last_id.clear();
    }

    pub fn last_id(&self) -> &str {
        &self.last_id
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Reshape one line of the references section, recording any new identifier.
///
/// Returns the rendered text, or the failure cause when the line opens a
/// reference whose identifier is never closed with `]`.
pub fn process_line(text: &str, table: &mut ReferenceTable) -> Result<String, String> {
    let stripped = text.trim();
    if stripped.is_empty() {
        return Ok(String::new());
    }

    if let Some(rest) = stripped.strip_prefix('[') {
        let id = rest
            .split_once(']')
            .map(|(id, _)| id)
            .ok_or_else(|| "unterminated reference identifier".to_string())?;
        table.record(id);
        return Ok(format!(".. {stripped}"));
    }

    // Continuation: align under the reference marker above. Before any [id]
    // has been seen the id is empty, giving a fixed six-space indent.
    Ok(format!(
        "{}{}",
        " ".repeat(6 + table.last_id().len()),
        stripped
    ))
}
