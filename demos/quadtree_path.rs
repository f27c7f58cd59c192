use planar_nav::{DecompositionConfig, Point, Polygon, build_world};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // An 800x800 world decomposed to depth 6, with a mix of rectangular and
    // irregular obstacles.
    let obstacles = vec![
        polygon(&[(0.0, 97.0), (0.0, 300.0), (372.0, 300.0), (243.0, 97.0)])?,
        polygon(&[(600.0, 200.0), (600.0, 250.0), (700.0, 250.0), (700.0, 200.0)])?,
        polygon(&[(0.0, 600.0), (0.0, 700.0), (300.0, 700.0), (300.0, 600.0)])?,
        polygon(&[(500.0, 100.0), (500.0, 150.0), (600.0, 150.0), (600.0, 100.0)])?,
        polygon(&[(405.0, 503.0), (195.0, 503.0), (195.0, 553.0), (405.0, 553.0)])?,
        polygon(&[(10.0, 763.0), (800.0, 763.0), (800.0, 783.0), (15.0, 783.0)])?,
        polygon(&[(400.0, 400.0), (800.0, 400.0), (800.0, 700.0), (300.0, 745.0)])?,
    ];

    let world = build_world(
        800.0,
        800.0,
        DecompositionConfig::Quadtree { max_depth: 6 },
        obstacles,
    )?;

    let tree = world.quadtree().ok_or("expected a quadtree world")?;
    println!("Decomposed into {} navigable cells.", tree.leaves().len());
    println!(
        "Neighbor graph: {} nodes, {} edges.",
        world.graph().node_count(),
        world.graph().edge_count()
    );

    let start = Point::new(10.0, 10.0);
    let goal = Point::new(790.0, 790.0);
    let path = world.find_path(&start, &goal)?;

    if path.is_empty() {
        println!("No path found.");
        return Ok(());
    }
    println!("Path found: {} cells, cost {:.1}", path.len(), path.cost);
    for (cell, waypoint) in path.cells.iter().zip(&path.waypoints) {
        println!("  {:?} at ({:.1}, {:.1})", cell, waypoint.x, waypoint.y);
    }

    Ok(())
}

fn polygon(points: &[(f64, f64)]) -> Result<Polygon, Box<dyn std::error::Error>> {
    let vertices = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    Ok(Polygon::new(vertices)?)
}
