//! Per-row actions offered next to each table row

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::data::record::Record;

pub type ActionHandler = Arc<dyn Fn(&Record) -> Result<()> + Send + Sync>;
pub type ActionPredicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Visual weight of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    #[default]
    Default,
    /// Rendered with warning styling (delete and friends)
    Destructive,
}

#[derive(Clone)]
pub struct RowAction {
    pub label: String,
    pub kind: ActionKind,
    handler: ActionHandler,
    show: Option<ActionPredicate>,
}

impl RowAction {
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            kind: ActionKind::Default,
            handler: Arc::new(handler),
            show: None,
        }
    }

    pub fn destructive(mut self) -> Self {
        self.kind = ActionKind::Destructive;
        self
    }

    /// Only offer the action for records matching `predicate`
    pub fn show_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.show = Some(Arc::new(predicate));
        self
    }

    pub fn view<F>(handler: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        Self::new("View", handler)
    }

    pub fn edit<F>(handler: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        Self::new("Edit", handler)
    }

    pub fn delete<F>(handler: F) -> Self
    where
        F: Fn(&Record) -> Result<()> + Send + Sync + 'static,
    {
        Self::new("Delete", handler).destructive()
    }

    pub fn is_visible_for(&self, record: &Record) -> bool {
        self.show.as_ref().map_or(true, |show| show(record))
    }

    pub fn invoke(&self, record: &Record) -> Result<()> {
        tracing::debug!(target: "row_action", "Invoking row action '{}'", self.label);
        (self.handler)(record)
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("conditional", &self.show.is_some())
            .finish()
    }
}

/// Actions to offer for `record`, in declaration order
pub fn visible_actions<'a>(actions: &'a [RowAction], record: &Record) -> Vec<&'a RowAction> {
    actions
        .iter()
        .filter(|action| action.is_visible_for(record))
        .collect()
}

/// The view/edit/delete set for whichever handlers are given
pub fn standard_actions(
    on_view: Option<ActionHandler>,
    on_edit: Option<ActionHandler>,
    on_delete: Option<ActionHandler>,
) -> Vec<RowAction> {
    let mut actions = Vec::new();
    if let Some(handler) = on_view {
        actions.push(RowAction::view(move |r| handler(r)));
    }
    if let Some(handler) = on_edit {
        actions.push(RowAction::edit(move |r| handler(r)));
    }
    if let Some(handler) = on_delete {
        actions.push(RowAction::delete(move |r| handler(r)));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_predicate_hides_action() {
        let actions = vec![
            RowAction::view(|_| Ok(())),
            RowAction::new("Archive", |_| Ok(()))
                .show_when(|r| r.value("status").as_str() == Some("active")),
        ];

        let active = Record::new().with("status", "active");
        let archived = Record::new().with("status", "archived");

        let labels: Vec<_> = visible_actions(&actions, &active)
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, vec!["View", "Archive"]);
        assert_eq!(visible_actions(&actions, &archived).len(), 1);
    }

    #[test]
    fn test_invoke_passes_record() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let action = RowAction::edit(move |r| {
            sink.lock().unwrap().push(r.value("id").to_string());
            Ok(())
        });

        action.invoke(&Record::new().with("id", 7)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["7".to_string()]);
    }

    #[test]
    fn test_standard_actions() {
        let noop: ActionHandler = Arc::new(|_| Ok(()));
        let actions = standard_actions(Some(noop.clone()), None, Some(noop));

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].label, "View");
        assert_eq!(actions[0].kind, ActionKind::Default);
        assert_eq!(actions[1].label, "Delete");
        assert_eq!(actions[1].kind, ActionKind::Destructive);
    }

    #[test]
    fn test_invoke_logs_under_row_action_target() {
        use crate::logging::{LogRingBuffer, RingBufferWriter};

        let buffer = LogRingBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(RingBufferWriter::new(buffer.clone()))
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .compact()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            RowAction::view(|_| Ok(())).invoke(&Record::new()).unwrap();
        });

        let entries = buffer.get_recent(10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].target, "row_action");
        assert_eq!(entries[0].message, "Invoking row action 'View'");
    }

    #[test]
    fn test_handler_error_propagates() {
        let action = RowAction::delete(|_| Err(anyhow::anyhow!("locked")));
        let err = action.invoke(&Record::new()).unwrap_err();
        assert_eq!(err.to_string(), "locked");
    }
}
