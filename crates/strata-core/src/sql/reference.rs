//! Foreign-key reference descriptor.

use super::types::ReferentialAction;

/// Target of a foreign key declared on one column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
  pub table:     String,
  pub column:    String,
  pub on_delete: Option<ReferentialAction>,
  pub on_update: Option<ReferentialAction>,
}

impl Reference {
  pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
    Self {
      table:     table.into(),
      column:    column.into(),
      on_delete: None,
      on_update: None,
    }
  }

  pub fn on_delete(mut self, action: ReferentialAction) -> Self {
    self.on_delete = Some(action);
    self
  }

  pub fn on_update(mut self, action: ReferentialAction) -> Self {
    self.on_update = Some(action);
    self
  }

  /// `" ON DELETE <ACTION>"`, or empty when unset.
  pub fn render_on_delete(&self) -> String {
    self
      .on_delete
      .map(|a| format!(" ON DELETE {a}"))
      .unwrap_or_default()
  }

  /// `" ON UPDATE <ACTION>"`, or empty when unset.
  pub fn render_on_update(&self) -> String {
    self
      .on_update
      .map(|a| format!(" ON UPDATE {a}"))
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unset_actions_render_nothing() {
    let r = Reference::new("parents", "id");
    assert_eq!(r.render_on_delete(), "");
    assert_eq!(r.render_on_update(), "");
  }

  #[test]
  fn set_actions_render_clauses() {
    let r = Reference::new("parents", "id")
      .on_delete(ReferentialAction::Cascade)
      .on_update(ReferentialAction::SetNull);
    assert_eq!(r.render_on_delete(), " ON DELETE CASCADE");
    assert_eq!(r.render_on_update(), " ON UPDATE SET NULL");
  }
}
