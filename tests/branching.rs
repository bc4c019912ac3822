// tests/branching.rs
use glam::Vec3;
use symbios_flora::{
    GeometryEvent, TurtleConfig, TurtleInterpreter, TurtleOp, UnbalancedStackError,
};

fn setup() -> TurtleInterpreter {
    TurtleInterpreter::standard(TurtleConfig::default().with_step(1.0).with_angle_degrees(90.0))
}

fn segment_ends(events: &[GeometryEvent]) -> Vec<(Vec3, Vec3)> {
    events
        .iter()
        .filter_map(|e| match e {
            GeometryEvent::Segment { start, end, .. } => Some((*start, *end)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_simple_branch_topology() {
    let interpreter = setup();

    // F [ F ] F
    // 1. Segment (0,0,0) -> (0,1,0).
    // 2. Push, segment (0,1,0) -> (0,2,0) at depth 1, pop back to (0,1,0).
    // 3. Segment (0,1,0) -> (0,2,0) at depth 0.
    let result = interpreter.interpret_str("F[F]F");

    assert_eq!(result.events.len(), 3, "Should have 3 segments");
    assert!(result.is_balanced());
    assert_eq!(result.max_depth, 1);

    let ends = segment_ends(&result.events);
    assert_eq!(ends[0], (Vec3::ZERO, Vec3::Y));
    assert_eq!(ends[1], (Vec3::Y, Vec3::Y * 2.0));
    assert_eq!(ends[2], (Vec3::Y, Vec3::Y * 2.0));

    let depths: Vec<usize> = result.events.iter().map(|e| e.depth()).collect();
    assert_eq!(depths, vec![0, 1, 0]);
}

#[test]
fn test_pop_restores_orientation() {
    let interpreter = setup();
    let result = interpreter.interpret_str("F[+F]F");

    let ends = segment_ends(&result.events);
    // Yaw +90 about Z turns growth from +Y to -X.
    assert!(ends[1].1.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
    assert!(ends[2].1.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_pitch_and_roll_axes() {
    let interpreter = setup();

    // Pitch +90 about X turns +Y into +Z.
    let pitched = segment_ends(&interpreter.interpret_str("&F").events);
    assert!(pitched[0].1.abs_diff_eq(Vec3::Z, 1e-5));

    // Roll spins about the growth axis, so the segment keeps going up.
    let rolled = segment_ends(&interpreter.interpret_str("\\F").events);
    assert!(rolled[0].1.abs_diff_eq(Vec3::Y, 1e-5));

    let turned = segment_ends(&interpreter.interpret_str("|F").events);
    assert!(turned[0].1.abs_diff_eq(Vec3::NEG_Y, 1e-5));
}

#[test]
fn test_lone_pop_is_reported_not_fatal() {
    let interpreter = setup();
    let result = interpreter.interpret_str("]");

    assert!(result.events.is_empty());
    assert_eq!(
        result.diagnostics,
        vec![UnbalancedStackError::PopOnEmpty { index: 0 }]
    );
    assert!(result.clone().into_result().is_err());
}

#[test]
fn test_stray_pop_keeps_drawing() {
    let interpreter = setup();
    let result = interpreter.interpret_str("F]F");

    assert_eq!(result.events.len(), 2);
    let ends = segment_ends(&result.events);
    assert_eq!(ends[1], (Vec3::Y, Vec3::Y * 2.0));
    assert_eq!(
        result.diagnostics,
        vec![UnbalancedStackError::PopOnEmpty { index: 1 }]
    );
}

#[test]
fn test_unclosed_branch_warning() {
    let interpreter = setup();
    let result = interpreter.interpret_str("F[[F");

    assert_eq!(result.events.len(), 2);
    assert_eq!(
        result.diagnostics,
        vec![UnbalancedStackError::UnclosedBranches { depth: 2 }]
    );
}

#[test]
fn test_depth_limit() {
    let config = TurtleConfig {
        max_stack_depth: 1,
        ..Default::default()
    };
    let interpreter = TurtleInterpreter::standard(config);
    let result = interpreter.interpret_str("[[F]]");

    assert_eq!(result.events.len(), 1);
    assert_eq!(
        result.diagnostics,
        vec![
            UnbalancedStackError::DepthExceeded { index: 1, max: 1 },
            UnbalancedStackError::PopOnEmpty { index: 4 },
        ]
    );
}

#[test]
fn test_leaf_and_width() {
    let interpreter = TurtleInterpreter::standard(TurtleConfig {
        default_width: 1.0,
        width_decay: 0.5,
        ..Default::default()
    });
    let result = interpreter.interpret_str("F!FL");

    match result.events.as_slice() {
        [
            GeometryEvent::Segment { width: w0, .. },
            GeometryEvent::Segment { width: w1, .. },
            GeometryEvent::Leaf {
                position, width, ..
            },
        ] => {
            assert_eq!(*w0, 1.0);
            assert_eq!(*w1, 0.5);
            assert_eq!(*width, 0.5);
            assert!(position.abs_diff_eq(Vec3::Y * 2.0, 1e-6));
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(result.leaves().count(), 1);
    assert_eq!(result.segments().count(), 2);
}

#[test]
fn test_move_and_unmapped_symbols() {
    let interpreter = setup();
    let result = interpreter.interpret_str("fXAF");

    assert_eq!(result.events.len(), 1);
    assert_eq!(segment_ends(&result.events)[0], (Vec3::Y, Vec3::Y * 2.0));
}

#[test]
fn test_custom_symbol_map() {
    let interpreter = TurtleInterpreter::new(TurtleConfig::default())
        .with_map([('G', TurtleOp::Forward), ('(', TurtleOp::Push), (')', TurtleOp::Pop)]);

    let result = interpreter.interpret_str("G(G)F");
    assert_eq!(result.events.len(), 2);
    assert!(result.is_balanced());
}

#[test]
fn test_interpretation_is_deterministic() {
    let interpreter = setup();
    let symbols = "F[+F[-F]L]&F[^F\\F]/FL";
    assert_eq!(
        interpreter.interpret_str(symbols),
        interpreter.interpret_str(symbols)
    );
}

#[test]
fn test_events_serialize() {
    let interpreter = setup();
    let result = interpreter.interpret_str("FL");
    let json = serde_json::to_string(&result.events).unwrap();
    let back: Vec<GeometryEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result.events);
}
