use slabloc::{Branch, NodeData, PointLocator, Pslg, SlabMap};

fn main() -> anyhow::Result<()> {
    let pslg = Pslg::ladder(12)?;
    let map = SlabMap::new(pslg);

    map.print_stats();

    let query = [0.4, 5.3];
    println!("\nLocating {:?}:", query);
    for decision in map.locate_one(&query) {
        let boundary = match decision.node {
            NodeData::Vertex(v) => format!("vertex {} at {:?}", v, map.pslg().coords(v)),
            NodeData::Edge(edge) => format!("edge ({}, {})", edge.p, edge.q),
        };
        let side = match decision.branch {
            Branch::Below => "below",
            Branch::Above => "above",
            Branch::Left => "left of",
            Branch::Right => "right of",
        };
        println!("\t{} {}", side, boundary);
    }

    Ok(())
}
