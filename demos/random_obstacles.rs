use anyhow::Result;
use rand::Rng;

use planar_nav::{Connectivity, DecompositionConfig, Point, Polygon, build_world};

fn main() -> Result<()> {
    let width = 400.0;
    let height = 400.0;
    let num_obstacles = 12;
    let max_obstacle_size = 60.0;

    // Scatter random axis-aligned boxes, keeping the corners clear so the
    // start and goal stay reachable more often than not.
    let mut rng = rand::rng();
    let mut obstacles = Vec::with_capacity(num_obstacles);
    println!("Generating {} random obstacles...", num_obstacles);
    for _ in 0..num_obstacles {
        let x0 = rng.random_range(40.0..width - 40.0 - max_obstacle_size);
        let y0 = rng.random_range(40.0..height - 40.0 - max_obstacle_size);
        let w = rng.random_range(10.0..max_obstacle_size);
        let h = rng.random_range(10.0..max_obstacle_size);
        obstacles.push(Polygon::rectangle(
            Point::new(x0, y0),
            Point::new(x0 + w, y0 + h),
        )?);
    }

    let world = build_world(
        width,
        height,
        DecompositionConfig::Grid {
            cell_size: 10.0,
            refine: true,
            connectivity: Connectivity::Eight,
        },
        obstacles,
    )?;

    let start = Point::new(5.0, 5.0);
    let goal = Point::new(width - 5.0, height - 5.0);
    match world.find_path(&start, &goal) {
        Ok(path) if !path.is_empty() => {
            println!("Path found: {} cells, cost {:.1}", path.len(), path.cost);
        }
        Ok(_) => println!("No path through this obstacle set."),
        Err(e) => println!("Query failed: {}", e),
    }

    Ok(())
}
