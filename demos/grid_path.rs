use std::collections::HashSet;

use planar_nav::{
    CellId, Connectivity, DecompositionConfig, Point, Polygon, build_world,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An 800x800 world on a 10-unit grid with six rectangular obstacles.
    let obstacles = vec![
        polygon(&[(0.0, 100.0), (0.0, 300.0), (300.0, 300.0), (300.0, 100.0)])?,
        polygon(&[(600.0, 200.0), (600.0, 250.0), (700.0, 250.0), (700.0, 200.0)])?,
        polygon(&[(200.0, 600.0), (200.0, 700.0), (300.0, 700.0), (300.0, 600.0)])?,
        polygon(&[(500.0, 100.0), (500.0, 150.0), (600.0, 150.0), (600.0, 100.0)])?,
        polygon(&[(400.0, 500.0), (200.0, 500.0), (200.0, 550.0), (400.0, 550.0)])?,
        polygon(&[(400.0, 400.0), (800.0, 400.0), (800.0, 600.0), (400.0, 600.0)])?,
    ];

    let world = build_world(
        800.0,
        800.0,
        DecompositionConfig::Grid {
            cell_size: 10.0,
            refine: false,
            connectivity: Connectivity::Eight,
        },
        obstacles,
    )?;

    let start = Point::new(15.0, 15.0);
    let goal = Point::new(785.0, 695.0);
    let path = world.find_path(&start, &goal)?;

    if path.is_empty() {
        println!("No path found.");
        return Ok(());
    }
    println!(
        "Path found: {} cells, cost {:.1}",
        path.len(),
        path.cost
    );

    let on_path: HashSet<(usize, usize)> = path
        .cells
        .iter()
        .filter_map(|c| match c {
            CellId::Grid { x, y } | CellId::Sub { x, y, .. } => Some((*x, *y)),
            CellId::Leaf(_) => None,
        })
        .collect();
    print_grid(&world, &on_path);

    Ok(())
}

fn polygon(points: &[(f64, f64)]) -> Result<Polygon, Box<dyn std::error::Error>> {
    let vertices = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    Ok(Polygon::new(vertices)?)
}

fn print_grid(world: &planar_nav::NavWorld, on_path: &HashSet<(usize, usize)>) {
    let Some(map) = world.grid() else {
        return;
    };
    // Top row printed last so y grows upward.
    for y in (0..map.rows()).rev() {
        let mut line = String::with_capacity(map.cols());
        for x in 0..map.cols() {
            let passable = map.cell(x, y).is_some_and(|c| c.is_passable());
            line.push(if on_path.contains(&(x, y)) {
                '*'
            } else if passable {
                '.'
            } else {
                '#'
            });
        }
        println!("{}", line);
    }
}
