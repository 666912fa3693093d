//! Route-table pipeline: decode, rebuild, layer, render, present.
//!
//! A new graph is built next to the current one and only swapped in after
//! the render target accepted the scene, so a failed update leaves the
//! previous diagram untouched. Callers serialise invocations per diagram.

use crate::error::DiagramError;
use crate::renderer::{DiagramRenderer, Theme};
use crate::scene::Scene;
use crate::target::RenderTarget;
use meshmap_topology::{GeometryPolicy, LayeringEngine, Layout, TopologyGraph};
use meshmap_wire::{CommandCode, CommandResponse, RouteEntry, RouteTableDecoder};
use tracing::{debug, info, warn};

/// What the diagram currently shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagramState {
    /// No route table drawn
    #[default]
    Empty,
    /// A route table is drawn
    Populated {
        /// Nodes drawn, coordinator included
        placed: usize,
        /// Graph nodes with no route to the coordinator
        unplaced: usize,
    },
}

/// Result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramOutcome {
    /// A route table was drawn
    Rendered {
        /// Decoded entries
        entries: usize,
        /// Hop levels below the coordinator
        levels: usize,
        /// Nodes drawn, coordinator included
        placed: usize,
        /// Graph nodes with no route to the coordinator
        unplaced: usize,
    },
    /// The diagram was emptied
    Cleared,
    /// The response was not a routing table
    Ignored(CommandCode),
}

/// Topology diagram of one coordinator
#[derive(Debug, Default)]
pub struct RouteDiagram {
    decoder: RouteTableDecoder,
    engine: LayeringEngine,
    renderer: DiagramRenderer,
    graph: TopologyGraph,
    layout: Option<Layout>,
    state: DiagramState,
}

impl RouteDiagram {
    /// Create an empty diagram
    pub fn new(policy: GeometryPolicy, theme: Theme) -> Self {
        Self {
            engine: LayeringEngine::new(policy),
            renderer: DiagramRenderer::new(theme),
            ..Self::default()
        }
    }

    /// Current state
    pub fn state(&self) -> DiagramState {
        self.state
    }

    /// Graph behind the current drawing
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// Layout behind the current drawing
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Run the pipeline if `response` carries a routing table
    pub fn handle_response(
        &mut self,
        response: &CommandResponse,
        target: &mut dyn RenderTarget,
    ) -> Result<DiagramOutcome, DiagramError> {
        if response.code != CommandCode::RouteTable {
            debug!("Response {} is not a routing table, diagram unchanged", response.code);
            return Ok(DiagramOutcome::Ignored(response.code));
        }

        let entries = self
            .decoder
            .decode_bytes(&response.parameters)
            .map_err(|e| {
                warn!("Rejected routing table response: {}", e);
                e
            })?;
        self.apply_entries(&entries, target)
    }

    /// Decode a hex payload and redraw
    pub fn apply_payload(
        &mut self,
        payload: &str,
        target: &mut dyn RenderTarget,
    ) -> Result<DiagramOutcome, DiagramError> {
        let entries = self
            .decoder
            .decode(payload)
            .map_err(|e| {
                warn!("Rejected routing table payload: {}", e);
                e
            })?;
        self.apply_entries(&entries, target)
    }

    /// Redraw from decoded entries; an empty table clears the diagram
    pub fn apply_entries(
        &mut self,
        entries: &[RouteEntry],
        target: &mut dyn RenderTarget,
    ) -> Result<DiagramOutcome, DiagramError> {
        if entries.is_empty() {
            info!("Routing table has no entries");
            return self.clear(target);
        }

        let graph = TopologyGraph::from_entries(entries);
        let layout = self.engine.layout(&graph);
        let scene = self.renderer.render(&layout);

        target.present(&scene)?;

        let outcome = DiagramOutcome::Rendered {
            entries: entries.len(),
            levels: layout.levels().len(),
            placed: layout.nodes().len(),
            unplaced: layout.unplaced().len(),
        };
        let state = DiagramState::Populated {
            placed: layout.nodes().len(),
            unplaced: layout.unplaced().len(),
        };

        info!(
            "Diagram {} updated: {} entries, {} nodes drawn, {} unreachable",
            target.id(),
            entries.len(),
            layout.nodes().len(),
            layout.unplaced().len()
        );

        self.graph = graph;
        self.layout = Some(layout);
        self.state = state;

        Ok(outcome)
    }

    /// Empty the diagram and show the placeholder
    pub fn clear(&mut self, target: &mut dyn RenderTarget) -> Result<DiagramOutcome, DiagramError> {
        let scene = self.placeholder();
        target.present(&scene)?;

        self.graph.reset();
        self.layout = None;
        if self.state != DiagramState::Empty {
            info!("Diagram {} cleared", target.id());
        }
        self.state = DiagramState::Empty;

        Ok(DiagramOutcome::Cleared)
    }

    fn placeholder(&self) -> Scene {
        let policy = self.engine.policy();
        self.renderer
            .placeholder(policy.canvas_width, policy.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::target::SvgBuffer;
    use meshmap_wire::{Address, DecodeErrorKind};

    fn payload(records: &[(u16, u16)]) -> String {
        let mut hex = format!("{:02X}", records.len());
        for (node, next_hop) in records {
            let [nl, nh] = node.to_le_bytes();
            let [hl, hh] = next_hop.to_le_bytes();
            hex.push_str(&format!("{:02X}{:02X}{:02X}{:02X}00000000", nl, nh, hl, hh));
        }
        hex
    }

    fn frame(code: u8, params: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xAA, 0x01, params.len() as u8, code];
        frame.extend_from_slice(params);
        frame.push(0x00);
        frame
    }

    /// Target that refuses every scene
    struct BrokenTarget;

    impl RenderTarget for BrokenTarget {
        fn id(&self) -> &str {
            "broken"
        }

        fn present(&mut self, _scene: &Scene) -> Result<(), RenderError> {
            Err(RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "surface gone",
            )))
        }
    }

    #[test]
    fn test_empty_to_populated() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");
        assert_eq!(diagram.state(), DiagramState::Empty);

        let outcome = diagram
            .apply_payload(&payload(&[(1, 1), (2, 1), (3, 2)]), &mut target)
            .unwrap();

        assert_eq!(
            outcome,
            DiagramOutcome::Rendered {
                entries: 3,
                levels: 3,
                placed: 4,
                unplaced: 0
            }
        );
        assert_eq!(
            diagram.state(),
            DiagramState::Populated {
                placed: 4,
                unplaced: 0
            }
        );
        assert_eq!(target.presented(), 1);
        assert_eq!(target.scene().unwrap().badges().count(), 4);
    }

    #[test]
    fn test_populated_is_fully_replaced() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");

        diagram.apply_payload(&payload(&[(0xAA, 0xAA)]), &mut target).unwrap();
        diagram.apply_payload(&payload(&[(0xBB, 0xBB)]), &mut target).unwrap();

        assert!(!diagram.graph().contains(Address(0xAA)));
        assert!(diagram.graph().contains(Address(0xBB)));
        let svg = target.document().unwrap();
        assert!(!svg.contains("0x00AA"));
        assert!(svg.contains("0x00BB"));
    }

    #[test]
    fn test_decode_error_keeps_previous_diagram() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");
        diagram.apply_payload(&payload(&[(1, 1)]), &mut target).unwrap();
        let before = target.document().unwrap().to_string();

        let err = diagram.apply_payload("03010001", &mut target).unwrap_err();
        match err {
            DiagramError::Decode(e) => assert!(matches!(e.reason, DecodeErrorKind::Truncated { .. })),
            other => panic!("unexpected error: {other}"),
        }

        assert!(diagram.graph().contains(Address(1)));
        assert!(matches!(diagram.state(), DiagramState::Populated { .. }));
        assert_eq!(target.presented(), 1);
        assert_eq!(target.document().unwrap(), before);
    }

    #[test]
    fn test_target_error_keeps_previous_diagram() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");
        diagram.apply_payload(&payload(&[(1, 1)]), &mut target).unwrap();

        let err = diagram
            .apply_payload(&payload(&[(2, 2)]), &mut BrokenTarget)
            .unwrap_err();
        assert!(matches!(err, DiagramError::Render(_)));
        assert!(diagram.graph().contains(Address(1)));
        assert!(!diagram.graph().contains(Address(2)));
    }

    #[test]
    fn test_clear_and_empty_table() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");

        diagram.apply_payload(&payload(&[(1, 1)]), &mut target).unwrap();
        assert_eq!(diagram.clear(&mut target).unwrap(), DiagramOutcome::Cleared);
        assert_eq!(diagram.state(), DiagramState::Empty);
        assert!(diagram.graph().is_empty());
        assert!(diagram.layout().is_none());
        assert!(target.scene().unwrap().is_placeholder());

        diagram.apply_payload(&payload(&[(1, 1)]), &mut target).unwrap();
        let outcome = diagram.apply_payload("00", &mut target).unwrap();
        assert_eq!(outcome, DiagramOutcome::Cleared);
        assert_eq!(diagram.state(), DiagramState::Empty);
    }

    #[test]
    fn test_handle_response_only_for_route_table() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");

        let info = CommandResponse::from_frame(&frame(0x09, &[0x01, 0x02])).unwrap();
        assert_eq!(
            diagram.handle_response(&info, &mut target).unwrap(),
            DiagramOutcome::Ignored(CommandCode::GetNetworkInfo)
        );
        assert_eq!(target.presented(), 0);

        let response = CommandResponse::from_hex("A2", &payload(&[(5, 5), (6, 5)])).unwrap();
        let outcome = diagram.handle_response(&response, &mut target).unwrap();
        assert!(matches!(outcome, DiagramOutcome::Rendered { placed: 3, .. }));
    }

    #[test]
    fn test_unreachable_next_hop_is_dropped() {
        let mut diagram = RouteDiagram::default();
        let mut target = SvgBuffer::new("routeMap");

        // Entry 0 of the reference payload: 0x0201 relays through silent 0x0403
        let outcome = diagram
            .apply_payload("0101020304000000FF", &mut target)
            .unwrap();

        assert_eq!(
            outcome,
            DiagramOutcome::Rendered {
                entries: 1,
                levels: 0,
                placed: 1,
                unplaced: 2
            }
        );
        assert_eq!(target.scene().unwrap().lines().count(), 0);
    }

    #[test]
    fn test_custom_geometry() {
        let policy = GeometryPolicy {
            canvas_width: 1000.0,
            ..GeometryPolicy::default()
        };
        let mut diagram = RouteDiagram::new(policy, Theme::default());
        let mut target = SvgBuffer::new("routeMap");

        diagram.apply_payload(&payload(&[(1, 1)]), &mut target).unwrap();
        let root = diagram.layout().unwrap().root().unwrap();
        assert_eq!(root.x, 500.0);
    }
}
