use weft::{
    ClothConfig, ClothLayout, Corners, Plane, Resolution, Scene, Shape, Sphere, SpringMode, StepObserver, Vec3,
};

#[derive(Default)]
struct Counter {
    forces: usize,
    integrations: usize,
    sweeps: usize,
    last_sweep: Option<usize>,
    completed: usize,
    collision_passes: usize,
    contacts: usize,
}

impl StepObserver for Counter {
    fn on_forces(&mut self) {
        self.forces += 1;
    }

    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_constraint_iteration(&mut self, iteration: usize) {
        self.sweeps += 1;
        self.last_sweep = Some(iteration);
    }

    fn on_step_complete(&mut self) {
        self.completed += 1;
    }

    fn on_collisions(&mut self, contacts: usize) {
        self.collision_passes += 1;
        self.contacts += contacts;
    }
}

fn gravity() -> Vec3<f32> {
    Vec3::new(0.0, -9.81, 0.0)
}

#[test]
fn observer_sees_every_stage() {
    let config = ClothConfig::new().with_gravity(gravity()).with_iterations(3);
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), config).unwrap();
    let mut counter = Counter::default();
    for _ in 0..10 {
        scene.update(1.0 / 60.0, &mut counter);
    }
    assert_eq!(counter.forces, 10);
    assert_eq!(counter.integrations, 10);
    assert_eq!(counter.sweeps, 30);
    assert_eq!(counter.last_sweep, Some(2));
    assert_eq!(counter.completed, 10);
    assert_eq!(counter.collision_passes, 10);
}

#[test]
fn force_mode_sweeps_only_with_tolerance() {
    let config = ClothConfig::new().with_spring_mode(SpringMode::Force).with_gravity(gravity());
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), config.clone()).unwrap();
    let mut counter = Counter::default();
    for _ in 0..5 {
        scene.update(1.0 / 60.0, &mut counter);
    }
    assert_eq!(counter.sweeps, 5);

    let mut loose: Scene<f32> = Scene::new(ClothLayout::default(), config.with_tolerance(None)).unwrap();
    let mut counter = Counter::default();
    for _ in 0..5 {
        loose.update(1.0 / 60.0, &mut counter);
    }
    assert_eq!(counter.sweeps, 0);
    assert_eq!(counter.completed, 5);
}

#[test]
fn hanging_cloth_hits_sphere_in_front_of_it() {
    let config = ClothConfig::new().with_gravity(gravity()).with_wind(Vec3::new(0.0, 0.0, 4.0));
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), config)
        .unwrap()
        .with_shapes([Shape::from(Sphere::new(Vec3::new(0.0, -0.2, 0.35), 0.3))]);

    let mut counter = Counter::default();
    for _ in 0..120 {
        scene.update(1.0 / 60.0, &mut counter);
    }
    assert!(counter.contacts > 0);
    let center = Vec3::new(0.0, -0.2, 0.35);
    for p in scene.cloth().particles() {
        assert!(p.pos.distance(center) >= 0.3 - 1e-4);
    }
}

#[test]
fn floor_catches_released_cloth() {
    let layout = ClothLayout::default().with_pinned([false; 4]);
    let config = ClothConfig::new().with_gravity(gravity()).with_iterations(4);
    let mut scene: Scene<f32> = Scene::new(layout, config).unwrap();
    scene.set_floor(true);

    let mut counter = Counter::default();
    for _ in 0..240 {
        scene.update(1.0 / 60.0, &mut counter);
    }
    assert!(counter.contacts > 0);
    // Unit square's lowest corner is at y = -0.5; the floor sits one unit below.
    for p in scene.cloth().particles() {
        assert!(p.pos.y > -1.55, "below floor at {:?}", p.pos);
    }
}

#[test]
fn update_refreshes_normals() {
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), ClothConfig::new()).unwrap();
    assert_eq!(scene.cloth().normal_at(4, 4), Some(Vec3::zero()));
    scene.update(1.0 / 60.0, &mut weft::NoOpStepObserver);
    let n = scene.cloth().normal_at(4, 4).unwrap();
    // The default sheet hangs in the xy-plane.
    assert!((n.z.abs() - 1.0).abs() < 1e-5, "normal = {:?}", n);
}

#[test]
fn reset_cloth_restores_layout() {
    let config = ClothConfig::new().with_gravity(gravity());
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), config).unwrap();
    let rest = scene.cloth().positions();
    for _ in 0..30 {
        scene.update(1.0 / 60.0, &mut weft::NoOpStepObserver);
    }
    assert_ne!(scene.cloth().positions(), rest);

    scene.reset_cloth().unwrap();
    assert_eq!(scene.cloth().positions(), rest);
    assert!(scene.cloth().particle(0, 0).unwrap().is_fixed());
    assert!(!scene.cloth().particle(0, 9).unwrap().is_fixed());
}

#[test]
fn reset_moves_floor_under_new_layout() {
    let mut scene: Scene<f64> = Scene::new(ClothLayout::default(), ClothConfig::new()).unwrap();
    scene.add_shape(Sphere::default());
    scene.set_floor(true);

    let tall = Corners::new(
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(1.0, 3.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    );
    let layout = ClothLayout::new(Resolution::Density(4), tall);
    scene.reset(layout, ClothConfig::new()).unwrap();

    assert_eq!((scene.cloth().width(), scene.cloth().height()), (4, 8));
    assert_eq!(scene.shapes().len(), 1);
    match scene.floor() {
        Some(Shape::Plane(p)) => assert!((p.corners()[0].y - 0.0).abs() < 1e-12),
        other => panic!("expected plane floor, got {:?}", other),
    }
}

#[test]
fn failed_reset_keeps_previous_cloth() {
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), ClothConfig::new()).unwrap();
    let bad = ClothLayout::new(Resolution::Explicit { width: 1, height: 1 }, Corners::unit_square());
    assert!(scene.reset(bad, ClothConfig::new()).is_err());
    assert_eq!(scene.cloth().particle_count(), 100);
}

#[test]
fn custom_floor_survives_reset() {
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), ClothConfig::new()).unwrap();
    let tilted = Plane::new(
        Vec3::new(-2.0, -1.0, 2.0),
        Vec3::new(2.0, -0.5, 2.0),
        Vec3::new(2.0, -0.5, -2.0),
        Vec3::new(-2.0, -1.0, -2.0),
    );
    scene.set_floor_plane(tilted.clone());

    let lower = ClothLayout::new(
        Resolution::Explicit { width: 5, height: 5 },
        Corners::new(
            Vec3::new(-0.5, -3.0, 0.0),
            Vec3::new(0.5, -3.0, 0.0),
            Vec3::new(0.5, -4.0, 0.0),
            Vec3::new(-0.5, -4.0, 0.0),
        ),
    );
    scene.reset(lower, ClothConfig::new()).unwrap();
    assert_eq!(scene.floor(), Some(&Shape::Plane(tilted)));

    // Switching back to the default floor places it under the new cloth.
    scene.set_floor(true);
    scene.reset(lower, ClothConfig::new()).unwrap();
    match scene.floor() {
        Some(Shape::Plane(p)) => assert!((p.corners()[0].y + 5.0).abs() < 1e-6),
        other => panic!("expected plane floor, got {:?}", other),
    }
}

#[test]
fn shapes_can_be_moved_and_cleared() {
    let mut scene: Scene<f32> = Scene::new(ClothLayout::default(), ClothConfig::new()).unwrap();
    scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.2));
    // Parked inside the sheet, the sphere would push particles out.
    for shape in scene.shapes_mut() {
        shape.translate(Vec3::new(0.0, 0.0, 5.0));
    }
    let before = scene.cloth().positions();
    assert_eq!(scene.update_collisions(), 0);
    assert_eq!(scene.cloth().positions(), before);

    scene.clear_shapes();
    assert!(scene.shapes().is_empty());
}
