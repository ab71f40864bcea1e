use spranim_animation_core::{Bounds, Coordinate, PointId, PolygonId, PolygonModel};

fn bounds() -> Bounds {
    Bounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(255.0, 255.0))
}

fn ring(n: usize) -> PolygonModel {
    let mut p = PolygonModel::new(PolygonId(0), bounds());
    for i in 0..n {
        let a = i as f64 / n as f64 * std::f64::consts::TAU;
        p.push_point(Coordinate::new(128.0 + 100.0 * a.cos(), 128.0 + 100.0 * a.sin()));
    }
    p
}

/// Walks forward and backward from `first` and checks both directions agree.
fn assert_consistent(p: &PolygonModel) {
    let forward: Vec<PointId> = p.points().map(|(id, _)| id).collect();
    assert_eq!(forward.len(), p.len());
    let Some(first) = p.first() else {
        return;
    };
    let mut backward = vec![first];
    let mut cursor = p.prev_of(first).unwrap();
    while cursor != first {
        backward.push(cursor);
        cursor = p.prev_of(cursor).unwrap();
        assert!(backward.len() <= p.len(), "backward walk does not close");
    }
    backward[1..].reverse();
    assert_eq!(forward, backward);
}

#[test]
fn removal_keeps_a_single_chain() {
    for n in 2..8 {
        for victim in 0..n {
            let mut p = ring(n);
            let ids: Vec<PointId> = p.points().map(|(id, _)| id).collect();
            p.remove_point(ids[victim]).unwrap();
            assert_eq!(p.len(), n - 1);
            assert!(!p.points().any(|(id, _)| id == ids[victim]));
            for &id in ids.iter().filter(|&&id| id != ids[victim]) {
                assert_ne!(p.next_of(id), Some(ids[victim]));
                assert_ne!(p.prev_of(id), Some(ids[victim]));
            }
            assert_consistent(&p);
        }
    }
}

#[test]
fn add_point_keeps_the_loop_consistent() {
    let mut p = ring(4);
    for (x, y) in [(128.0, 20.0), (240.0, 240.0), (0.0, 128.0), (129.0, 129.0), (300.0, -5.0)] {
        p.add_point(Coordinate::new(x, y));
        assert_consistent(&p);
    }
    assert_eq!(p.len(), 9);
    assert!(p.points().all(|(_, c)| bounds().contains(c)));
}

#[test]
fn point_far_outside_a_segment_goes_beyond_the_neighbour() {
    // Open chain order A(0,0) B(10,0) C(10,10) D(0,10).
    let mut p = PolygonModel::new(PolygonId(0), bounds());
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
        p.push_point(Coordinate::new(x, y));
    }
    // Nearest is C, its right neighbour D is closer than B, and the point is farther
    // from C than |CD|, so it lands beyond D.
    p.add_point(Coordinate::new(12.0, 22.0));
    let order: Vec<[f64; 2]> = p.points().map(|(_, c)| c.to_array()).collect();
    assert_eq!(
        order,
        vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [12.0, 22.0]]
    );
}
