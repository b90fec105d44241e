//! Example: Laying out a small service graph
//!
//! Builds the same graph twice: once letting trellis pick the algorithm and
//! once forcing a left-to-right layered drawing.

use trellis::{
    AutoLayout, LayoutOptions, analyze_graph,
    config::{Algorithm, Direction, LayeredOptions},
    geometry::Size,
    model::{Connection, Node},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let nodes = vec![
        Node::new("client").with_size(Size::new(120.0, 40.0)),
        Node::new("gateway"),
        Node::new("auth"),
        Node::new("orders"),
        Node::new("database").with_size(Size::new(140.0, 60.0)),
    ];
    let connections = vec![
        Connection::new("c1", "client", "gateway"),
        Connection::new("c2", "gateway", "auth"),
        Connection::new("c3", "gateway", "orders"),
        Connection::new("c4", "auth", "database"),
        Connection::new("c5", "orders", "database"),
    ];

    let characteristics = analyze_graph(&nodes, &connections)?;
    println!(
        "{} nodes, {} connections, dag: {}, tree: {}",
        characteristics.node_count,
        characteristics.edge_count,
        characteristics.is_dag,
        characteristics.is_tree
    );

    let automatic = AutoLayout::default().compute(&nodes, &connections)?;
    println!("\nAutomatic ({}):", automatic.algorithm());
    for (id, position) in automatic.positions() {
        println!("  {id:<10} ({:>8.1}, {:>8.1})", position.x(), position.y());
    }

    let options = LayoutOptions::default()
        .with_algorithm(Algorithm::Layered)
        .with_layered(LayeredOptions {
            direction: Direction::LeftRight,
            ..LayeredOptions::default()
        });
    let layered = AutoLayout::new(options).compute(&nodes, &connections)?;
    println!(
        "\nLayered, left to right ({} crossings):",
        layered.metrics().edge_crossings().unwrap_or(0)
    );
    for (id, position) in layered.positions() {
        println!("  {id:<10} ({:>8.1}, {:>8.1})", position.x(), position.y());
    }

    let size = layered.metrics().bounding_box();
    println!("\nBounding box: {} x {}", size.width(), size.height());

    Ok(())
}
