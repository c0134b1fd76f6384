mod component;
mod dom;
mod error;
mod registry;
mod render;
mod routing;
mod state;
mod surface;
#[cfg(test)]
mod testing;
mod types;
mod visibility;

pub use component::NodelCanvas;
pub use dom::{
	ConnectorGeometry, DomConnector, DomSurface, Rect, connector_geometry, is_connection_target,
};
pub use error::{NodelError, Result};
pub use registry::{Connection, ConnectionRegistry};
pub use render::{DrawReport, NodelRender, escape_markup, substitute};
pub use routing::{Endpoint, Route, resolve_endpoint, resolve_routes};
pub use state::{
	BindingCallback, ConnectionBinding, DEFAULT_CONNECTION_COLOR, Helper, Helpers, MAX_SCALE,
	MIN_SCALE, NodelConfig, PanState, TemplateState, ViewTransform,
};
pub use surface::{ElementSpec, LineSpec, Surface};
pub use types::{Graph, Group, Node};
pub use visibility::{VisibleSet, is_visible, leaves_of, visible_nodes};
