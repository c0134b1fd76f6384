use super::surface::Surface;

/// A drawn connection as seen by the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
	pub from: String,
	pub to: String,
	pub kind: String,
	pub label: String,
	pub color: String,
	pub dashed: bool,
}

struct DrawnConnection<C> {
	connection: Connection,
	handle: C,
}

/// Connections currently on the surface, removed in bulk before each redraw.
pub struct ConnectionRegistry<C> {
	lines: Vec<DrawnConnection<C>>,
}

impl<C> Default for ConnectionRegistry<C> {
	fn default() -> Self {
		Self { lines: Vec::new() }
	}
}

impl<C> ConnectionRegistry<C> {
	pub fn push(&mut self, connection: Connection, handle: C) {
		self.lines.push(DrawnConnection { connection, handle });
	}

	pub fn connections(&self) -> impl Iterator<Item = &Connection> {
		self.lines.iter().map(|line| &line.connection)
	}

	pub fn disconnect_all<S>(&mut self, surface: &mut S)
	where
		S: Surface<Connector = C>,
	{
		for line in self.lines.drain(..) {
			surface.disconnect(line.handle);
		}
	}
}
