//! Screen implementations. Each screen is a top-level Component.

pub mod routers;
pub mod topology;

use crate::component::Component;
use crate::screen::ScreenId;

pub use routers::RouterListView;
pub use topology::TopologyView;

/// Instantiate one component per screen.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    ScreenId::ALL
        .iter()
        .map(|&id| {
            let screen: Box<dyn Component> = match id {
                ScreenId::Routers => Box::new(RouterListView::new()),
                ScreenId::Topology => Box::new(TopologyView::new()),
            };
            (id, screen)
        })
        .collect()
}
