//! Terminal rendering of election frames

use colored::*;
use ring_election::{Frame, NodeView, Renderer, RingLayout, Role};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Pos")]
    index: usize,
    #[tabled(rename = "Id")]
    id: u64,
    #[tabled(rename = "Label")]
    label: u64,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "x, y")]
    position: String,
}

/// Colour of a role, passive nodes in red like a knocked-out peer
pub fn paint_role(role: Role) -> ColoredString {
    let text = role.to_string();
    match role {
        Role::Active => text.yellow(),
        Role::Passive => text.red(),
        Role::Leader => text.green().bold(),
        Role::Loser => text.dimmed(),
    }
}

/// Successor chain, e.g. `5 -> 3 -> 9 -> 1 -> 5`
pub fn ring_chain(layout: &RingLayout) -> String {
    let mut chain: Vec<String> = layout.edges.iter().map(|(from, _)| from.to_string()).collect();
    if let Some((_, to)) = layout.edges.last() {
        chain.push(to.to_string());
    }
    chain.join(" -> ")
}

fn rows(layout: &RingLayout, nodes: &[NodeView]) -> Vec<NodeRow> {
    nodes
        .iter()
        .map(|node| {
            let (x, y) = layout
                .positions
                .get(node.index)
                .copied()
                .unwrap_or_default();

            NodeRow {
                index: node.index,
                id: node.id,
                label: node.candidate,
                role: paint_role(node.role).to_string(),
                position: format!("{:6.1}, {:6.1}", x, y),
            }
        })
        .collect()
}

/// Prints every frame as a table
#[derive(Debug, Default)]
pub struct TableRenderer {
    header_shown: bool,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TableRenderer {
    fn draw(&mut self, layout: &RingLayout, frame: &Frame) {
        if !self.header_shown {
            println!("{} {}", "Ring:".cyan().bold(), ring_chain(layout));
            self.header_shown = true;
        }

        let title = if frame.finished {
            format!("Round {} (finished)", frame.round)
        } else {
            format!("Round {}", frame.round)
        };
        println!("\n{}", title.cyan());
        println!("{}", Table::new(rows(layout, &frame.nodes)));
    }
}
