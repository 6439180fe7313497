//! Touch sequences driven through a full sculpting session.

use glam::{Vec2, Vec3};
use sculpting::hit_test::screen_to_ndc;
use sculpting::{
    DisplayConfig, GesturePhase, InteractionConfig, InteractionMode, Mesh, SculptAction,
    SculptError, SculptSession, TouchEvent,
};

const VIEWPORT: f32 = 800.0;

/// 41x41 grid with 0.25 spacing in the z = 0 plane, spanning [-5, 5].
fn grid() -> Mesh {
    let n = 41u32;
    let mut positions = Vec::new();
    for y in 0..n {
        for x in 0..n {
            positions.push(Vec3::new(x as f32 * 0.25 - 5.0, y as f32 * 0.25 - 5.0, 0.0));
        }
    }
    let mut indices = Vec::new();
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let i = y * n + x;
            indices.extend_from_slice(&[i, i + 1, i + n + 1, i, i + n + 1, i + n]);
        }
    }
    Mesh::new(positions, Vec::new(), indices).unwrap()
}

fn loaded_session() -> SculptSession {
    let mut session =
        SculptSession::new(InteractionConfig::default(), DisplayConfig::new(800, 800)).unwrap();
    let sender = session.begin_model_load();
    assert!(sender.deliver(grid()));
    assert!(session.poll_model());
    session
}

fn sculpting(action: SculptAction) -> SculptSession {
    let mut session = loaded_session();
    assert_eq!(session.toggle_sculpt_mode(), InteractionMode::Sculpt);
    session.set_action(action);
    session
}

fn positions(session: &SculptSession) -> Vec<Vec3> {
    session.model().unwrap().mesh.positions().to_vec()
}

/// Where a touch lands on the z = 0 plane, in model-local coordinates.
fn local_point_under(session: &SculptSession, screen: Vec2) -> Vec3 {
    let ndc = screen_to_ndc(screen, Vec2::splat(VIEWPORT));
    let ray = session.camera().ray_from_ndc(ndc);
    let world = ray.at(-ray.origin.z / ray.direction.z);
    let model = session.model().unwrap();
    model.transform.to_affine().inverse().transform_point3(world)
}

#[test]
fn add_stroke_pulls_vertices_toward_touch() {
    let mut session = sculpting(SculptAction::Add);
    let touch = Vec2::new(410.0, 400.0);
    let center = local_point_under(&session, touch);
    let before = positions(&session);

    session.handle_touch(&TouchEvent::start(&[touch]));
    assert_eq!(session.last_diagnostic(), None);

    let after = positions(&session);
    let mut moved = 0;
    for (old, new) in before.iter().zip(&after) {
        if old == new {
            continue;
        }
        moved += 1;
        assert!(old.distance(center) < 0.5, "vertex outside the brush moved");
        assert!(new.distance(center) < old.distance(center) + 1e-5);
        assert!(new.z.abs() < 1e-5);
    }
    assert!(moved > 0);
}

#[test]
fn touches_on_screen_center_lines_hit_grid_edges() {
    // The center column and row land exactly on grid lines of the model
    for touch in [Vec2::new(400.0, 410.0), Vec2::new(390.0, 400.0)] {
        let mut session = sculpting(SculptAction::Add);
        let before = positions(&session);

        session.handle_touch(&TouchEvent::start(&[touch]));

        assert_eq!(session.last_diagnostic(), None, "touch at {touch:?}");
        assert_ne!(positions(&session), before, "touch at {touch:?}");
    }
}

#[test]
fn subtract_stroke_pushes_vertices_away() {
    let mut session = sculpting(SculptAction::Subtract);
    let touch = Vec2::new(390.0, 420.0);
    let center = local_point_under(&session, touch);
    let before = positions(&session);

    session.handle_touch(&TouchEvent::start(&[touch]));

    let after = positions(&session);
    let moved: Vec<_> = before.iter().zip(&after).filter(|(old, new)| old != new).collect();
    assert!(!moved.is_empty());
    for (old, new) in moved {
        assert!(new.distance(center) > old.distance(center) - 1e-5);
    }
}

#[test]
fn stroke_deforms_on_every_move() {
    let mut session = sculpting(SculptAction::Add);
    let touch = Vec2::new(410.0, 400.0);
    session.handle_touch(&TouchEvent::start(&[touch]));
    session.acknowledge_render();
    let after_first = positions(&session);

    session.handle_touch(&TouchEvent::moved(&[touch + Vec2::new(2.0, 0.0)]));
    assert!(session.render_snapshot().mesh_dirty);
    assert_ne!(positions(&session), after_first);

    session.handle_touch(&TouchEvent::end(&[]));
    assert_eq!(session.gesture_state().phase, GesturePhase::Idle);
}

#[test]
fn stroke_invalidates_spatial_index() {
    let mut session = sculpting(SculptAction::Add);
    let touch = Vec2::new(410.0, 400.0);

    session.handle_touch(&TouchEvent::start(&[touch]));
    let index = session.model().unwrap().mesh.spatial_index();
    assert!(!index.is_current());
    assert_eq!(index.build_count(), 1);

    // The next query rebuilds against the displaced geometry
    session.handle_touch(&TouchEvent::moved(&[touch]));
    assert_eq!(session.model().unwrap().mesh.spatial_index().build_count(), 2);
}

#[test]
fn navigate_drag_rotates_without_deforming() {
    let mut session = loaded_session();
    let before = positions(&session);

    session.handle_touch(&TouchEvent::start(&[Vec2::new(400.0, 400.0)]));
    session.handle_touch(&TouchEvent::moved(&[Vec2::new(420.0, 390.0)]));
    session.handle_touch(&TouchEvent::end(&[]));

    let rotation = session.model().unwrap().transform.rotation;
    assert!((rotation.y - 0.3).abs() < 1e-6);
    assert!((rotation.x + 0.15).abs() < 1e-6);
    assert_eq!(positions(&session), before);
}

#[test]
fn pinch_zooms_in_sculpt_mode_without_deforming() {
    let mut session = sculpting(SculptAction::Add);
    let before = positions(&session);

    session.handle_touch(&TouchEvent::start(&[Vec2::new(300.0, 400.0), Vec2::new(500.0, 400.0)]));
    session.handle_touch(&TouchEvent::moved(&[Vec2::new(350.0, 400.0), Vec2::new(450.0, 400.0)]));

    // Fingers closed by 100 px: camera backs off by one unit
    assert!((session.camera().distance - 11.0).abs() < 1e-5);
    assert_eq!(positions(&session), before);
}

#[test]
fn touch_off_model_reports_no_intersection() {
    let mut session = sculpting(SculptAction::Add);
    let before = positions(&session);

    session.handle_touch(&TouchEvent::start(&[Vec2::new(5.0, 5.0)]));

    assert_eq!(session.last_diagnostic(), Some(&SculptError::NoIntersection));
    assert_eq!(positions(&session), before);
}

#[test]
fn sculpting_waits_for_model() {
    let mut session =
        SculptSession::new(InteractionConfig::default(), DisplayConfig::new(800, 800)).unwrap();
    session.toggle_sculpt_mode();
    session.set_action(SculptAction::Add);
    let sender = session.begin_model_load();

    session.handle_touch(&TouchEvent::start(&[Vec2::new(410.0, 400.0)]));
    assert_eq!(session.take_diagnostic(), Some(SculptError::NoMeshLoaded));
    session.handle_touch(&TouchEvent::end(&[]));

    assert!(sender.deliver(grid()));
    // The next event picks up the finished load before sculpting
    session.handle_touch(&TouchEvent::start(&[Vec2::new(410.0, 400.0)]));
    assert!(session.model().is_some());
    assert_eq!(session.last_diagnostic(), None);
    assert!(session.render_snapshot().geometry.is_some());
}

#[test]
fn mode_observer_tracks_buttons() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut session = loaded_session();
    let visible = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&visible);
    session.subscribe_mode(move |snapshot| {
        sink.borrow_mut().push(snapshot.action_controls_visible);
    });

    session.toggle_sculpt_mode();
    session.set_action(SculptAction::Add);
    session.toggle_sculpt_mode();

    assert_eq!(*visible.borrow(), vec![true, true, false]);
    assert_eq!(session.action(), Some(SculptAction::Add));
}
