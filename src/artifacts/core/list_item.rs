use crate::artifacts::objects::commit::Commit;

/// An element that can be shown in a filterable list panel
///
/// `id` must be stable across refreshes of the backing list: it is what the
/// selection follows. `label` is the text the filter matches against.
pub trait ListItem {
    fn id(&self) -> &str;

    fn label(&self) -> &str;
}

impl ListItem for Commit {
    fn id(&self) -> &str {
        self.sha().as_str()
    }

    fn label(&self) -> &str {
        self.name()
    }
}
