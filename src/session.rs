//! One mounted document: its tree, its view and their shared lifetime.

use crate::mindmap::MindMap;
use crate::mindmap::command::{Command, View, dispatch};
use crate::parser::build_mind_map;
use tracing::{debug, info};

/// A document mounted into a [`View`].
///
/// Mounting builds the tree, renders it and fits it. Dropping the session
/// destroys the view, so a document's rendering state never outlives it.
pub struct Visualization<V: View> {
    name: String,
    map: Option<MindMap>,
    view: V,
}

impl<V: View> Visualization<V> {
    /// Build the tree for `text` and paint it into `view`.
    ///
    /// Absent or empty text mounts an empty session: nothing is rendered and
    /// every command is a no-op.
    pub fn mount(name: impl Into<String>, text: Option<&str>, mut view: V) -> Self {
        let name = name.into();
        let map = build_mind_map(text, &name);
        match &map {
            Some(map) => {
                info!(
                    document = %name,
                    nodes = map.node_count(),
                    depth = map.max_depth(),
                    "mounted mind map"
                );
                view.render_data(map);
                view.fit();
            }
            None => info!(document = %name, "nothing to visualize"),
        }
        Self { name, map, view }
    }

    /// Apply a keyboard command. Returns whether anything happened.
    pub fn handle_command(&mut self, command: Command) -> bool {
        dispatch(command, self.map.as_mut(), &mut self.view)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self) -> Option<&MindMap> {
        self.map.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

impl<V: View> Drop for Visualization<V> {
    fn drop(&mut self) {
        debug!(document = %self.name, "unmounting mind map");
        self.view.destroy();
    }
}
