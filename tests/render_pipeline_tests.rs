use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use maze_viewer::core::{build_frame, Button, Frame, RenderPipeline, Viewport, WALK_SPEED};
use maze_viewer::{parse_world, AppContext, CameraState, LoadError, LoadStatus, Scene, SceneBuffer};

/// Records what a real backend would have been asked to do
#[derive(Default)]
struct MockPipeline {
    uploads: Vec<usize>,
    clears: usize,
    draws: Vec<u32>,
    next_handle: u32,
}

impl RenderPipeline for MockPipeline {
    type Buffer = u32;

    fn upload(&mut self, scene: &Scene) -> u32 {
        self.uploads.push(scene.vertex_count());
        self.next_handle += 1;
        self.next_handle
    }

    fn submit(&mut self, frame: &Frame<'_, u32>) -> Result<(), Box<dyn std::error::Error>> {
        self.clears += 1;
        if let Some(draw) = &frame.draw {
            self.draws.push(draw.vertex_count);
        }
        Ok(())
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 800,
    height: 600,
};

fn triangle() -> Scene {
    parse_world("1 2 3 0 0\n4 5 6 0 0\n7 8 9 0 0\n").unwrap()
}

/// Poll until the background load settles or a second passes
fn wait_for_load(app: &mut AppContext<u32>, pipeline: &mut MockPipeline) {
    let deadline = Instant::now() + Duration::from_secs(1);
    while app.load_status() == LoadStatus::Loading && Instant::now() < deadline {
        app.tick(0.0, pipeline);
        std::thread::sleep(Duration::from_millis(1));
    }
}

// ============================================================================
// Frame building
// ============================================================================

#[test]
fn test_frame_before_load_is_clear_only() {
    let camera = CameraState::new();
    let scene: SceneBuffer<u32> = SceneBuffer::new();

    let frame = build_frame(0, &camera, &scene, VIEWPORT);
    assert!(!frame.has_draw());
    assert_eq!(frame.viewport, VIEWPORT);
}

#[test]
fn test_frame_after_upload_draws_all_vertices() {
    let mut pipeline = MockPipeline::default();
    let camera = CameraState::new();
    let mut scene = SceneBuffer::new();
    scene.upload(&mut pipeline, &triangle());

    let frame = build_frame(7, &camera, &scene, VIEWPORT);
    let draw = frame.draw.as_ref().unwrap();

    assert_eq!(frame.number, 7);
    assert_eq!(draw.vertex_count, 3);
    assert_eq!(*draw.buffer, 1);
    assert_eq!(draw.uniforms, camera.to_uniform(VIEWPORT.aspect()));
}

#[test]
fn test_empty_scene_is_not_drawn() {
    let mut pipeline = MockPipeline::default();
    let mut scene = SceneBuffer::new();
    scene.upload(&mut pipeline, &Scene::default());

    assert!(scene.is_ready());
    let frame = build_frame(0, &CameraState::new(), &scene, VIEWPORT);
    assert!(!frame.has_draw());
}

#[test]
fn test_frame_uniforms_follow_camera() {
    let mut pipeline = MockPipeline::default();
    let mut scene = SceneBuffer::new();
    scene.upload(&mut pipeline, &triangle());

    let mut camera = CameraState::new();
    let before = build_frame(0, &camera, &scene, VIEWPORT).draw.unwrap().uniforms;
    camera.yaw = 30.0;
    let after = build_frame(1, &camera, &scene, VIEWPORT).draw.unwrap().uniforms;

    assert_eq!(before.projection, after.projection);
    assert_ne!(before.model_view, after.model_view);
}

// ============================================================================
// Application context
// ============================================================================

#[test]
fn test_render_before_load_clears_without_drawing() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.render(&mut pipeline, VIEWPORT).unwrap();

    assert_eq!(pipeline.clears, 1);
    assert!(pipeline.draws.is_empty());
    assert_eq!(app.frame_number(), 1);
}

#[test]
fn test_async_load_uploads_once() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.scene_mut().load_with(|| Ok(triangle()));
    wait_for_load(&mut app, &mut pipeline);

    assert_eq!(app.load_status(), LoadStatus::Ready);
    assert_eq!(app.scene().vertex_count(), Some(3));

    // Further ticks never upload again
    app.tick(15.0, &mut pipeline);
    app.tick(30.0, &mut pipeline);
    assert_eq!(pipeline.uploads, vec![3]);

    app.render(&mut pipeline, VIEWPORT).unwrap();
    assert_eq!(pipeline.draws, vec![3]);
}

#[test]
fn test_failed_load_stays_not_ready() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.scene_mut()
        .load_with(|| parse_world("1 2 oops 0 0\n").map_err(LoadError::from));
    wait_for_load(&mut app, &mut pipeline);

    match app.load_status() {
        LoadStatus::Failed(message) => assert!(message.contains("line 1"), "{message}"),
        other => panic!("expected Failed, got {other:?}"),
    }

    app.render(&mut pipeline, VIEWPORT).unwrap();
    assert_eq!(pipeline.clears, 1);
    assert!(pipeline.draws.is_empty());
    assert!(pipeline.uploads.is_empty());
}

#[test]
fn test_loader_that_dies_is_reported() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.scene_mut().load_with(|| panic!("loader crashed"));
    wait_for_load(&mut app, &mut pipeline);

    assert!(matches!(app.load_status(), LoadStatus::Failed(_)));
}

#[test]
fn test_missing_world_file_fails() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.load_world("definitely/missing/world.txt");
    wait_for_load(&mut app, &mut pipeline);

    match app.load_status() {
        LoadStatus::Failed(message) => assert!(message.contains("world.txt"), "{message}"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn test_holding_up_walks_forward() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.tick(0.0, &mut pipeline);
    app.controller.press(Button::ArrowUp);
    app.tick(100.0, &mut pipeline);

    assert_eq!(app.camera.rates.speed, WALK_SPEED);
    assert_eq!(app.camera.rates.yaw_rate, 0.0);
    assert_eq!(app.camera.rates.pitch_rate, 0.0);
    assert_relative_eq!(app.camera.position.z, -0.3, epsilon = 1e-6);

    app.controller.release(Button::ArrowUp);
    app.tick(200.0, &mut pipeline);

    assert_eq!(app.camera.rates.speed, 0.0);
    assert_relative_eq!(app.camera.position.z, -0.3, epsilon = 1e-6);
}

#[test]
fn test_turning_while_stationary() {
    let mut pipeline = MockPipeline::default();
    let mut app: AppContext<u32> = AppContext::new();

    app.controller.press(Button::KeyA);
    app.tick(0.0, &mut pipeline);
    app.tick(50.0, &mut pipeline);

    assert_relative_eq!(app.camera.yaw, 5.0, epsilon = 1e-5);
    assert_eq!(app.camera.position, CameraState::new().position);
}
