use weft::{
    Cloth, ClothConfig, Corners, Integrator, NoOpStepObserver, Plane, Shape, SpringMode, Sphere, Vec3,
};

fn run(config: ClothConfig<f32>, steps: usize) -> Vec<Vec3<f32>> {
    let mut cloth: Cloth<f32> = Cloth::new(12, 12, Corners::unit_square(), config).unwrap();
    cloth.set_fixed_corners(true, true, false, false);
    let shapes = [
        Shape::from(Sphere::new(Vec3::new(0.0, -0.8, 0.2), 0.3)),
        Shape::from(Plane::floor(-1.2, 4.0)),
    ];
    for _ in 0..steps {
        cloth.step_with_shapes(1.0 / 60.0, &shapes, &mut NoOpStepObserver);
    }
    cloth.positions()
}

fn assert_all_equal(results: &[Vec<Vec3<f32>>]) {
    for r in &results[1..] {
        for (a, b) in results[0].iter().zip(r.iter()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_eq!(a.z, b.z);
        }
    }
}

#[test]
fn constraint_mode_deterministic() {
    for scheme in [Integrator::Euler, Integrator::Verlet] {
        let results: Vec<_> = (0..5)
            .map(|_| {
                let config = ClothConfig::new()
                    .with_integrator(scheme)
                    .with_gravity(Vec3::new(0.0, -9.81, 0.0))
                    .with_wind(Vec3::new(0.0, 0.0, 2.0))
                    .with_iterations(6);
                run(config, 120)
            })
            .collect();
        assert_all_equal(&results);
    }
}

#[test]
fn force_mode_deterministic() {
    for scheme in [Integrator::Euler, Integrator::Verlet] {
        let results: Vec<_> = (0..5)
            .map(|_| {
                let config = ClothConfig::new()
                    .with_integrator(scheme)
                    .with_spring_mode(SpringMode::Force)
                    .with_gravity(Vec3::new(0.0, -9.81, 0.0));
                run(config, 120)
            })
            .collect();
        assert_all_equal(&results);
    }
}
