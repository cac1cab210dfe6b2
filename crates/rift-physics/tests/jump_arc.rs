//! Full jump arc over a flat plane, checked against the closed-form
//! ballistic solution.

use approx::assert_relative_eq;
use glam::Vec3;
use rift_physics::{
    Action, ActorController, GroundContact, InputState, LocomotionConfig, MovementBasis,
    SurfaceDesc, SurfaceRegistry, SurfaceShape,
};

const DT: f32 = 1.0 / 120.0;

fn plane_at(height: f32) -> SurfaceRegistry {
    let mut registry = SurfaceRegistry::new();
    registry
        .register(SurfaceDesc::terrain(
            SurfaceShape::Plane {
                half_width: 50.0,
                half_depth: 50.0,
            },
            Vec3::new(0.0, height, 0.0),
        ))
        .unwrap();
    registry
}

#[test]
fn jump_reaches_apex_and_resnaps_to_rest_height() {
    // Centre rests at 1.6 on a plane at 1.1
    let registry = plane_at(1.1);
    let config = LocomotionConfig::default();
    let controller = ActorController::new(config.clone()).unwrap();

    let (mut actor, contact) = controller.spawn(&registry, Vec3::new(0.0, 10.0, 0.0), 0.0);
    assert!(contact.is_grounded());
    assert_relative_eq!(actor.position.y, 1.6, epsilon = 1e-4);

    let expected_apex = 1.6 + config.jump_speed.powi(2) / (2.0 * -config.gravity);
    let expected_flight = 2.0 * config.jump_speed / -config.gravity;

    let report = controller.update(
        &mut actor,
        &InputState::default().with(Action::Jump),
        &registry,
        DT,
    );
    assert!(report.integration.jumped);

    let mut time = DT;
    let mut apex = actor.position.y;
    let mut apex_time = time;

    loop {
        let report = controller.update(&mut actor, &InputState::default(), &registry, DT);
        time += DT;

        if actor.position.y > apex {
            apex = actor.position.y;
            apex_time = time;
        }
        if report.contact.is_grounded() {
            break;
        }
        assert!(time < 10.0, "actor never landed");
    }

    assert_relative_eq!(apex, expected_apex, epsilon = 0.2);
    assert_relative_eq!(apex_time, expected_flight / 2.0, epsilon = 0.03);
    assert_relative_eq!(time, expected_flight, epsilon = 0.05);

    assert_relative_eq!(actor.position.y, 1.6, epsilon = 1e-4);
    assert_eq!(actor.vertical_velocity, 0.0);
    assert!(actor.grounded);
}

#[test]
fn landing_time_is_stable_across_frame_rates() {
    let registry = plane_at(0.0);
    let controller = ActorController::with_default_config();

    let flight_time = |dt: f32| {
        let (mut actor, _) = controller.spawn(&registry, Vec3::ZERO, 0.0);
        controller.update(
            &mut actor,
            &InputState::default().with(Action::Jump),
            &registry,
            dt,
        );
        let mut time = dt;
        while !actor.grounded {
            controller.update(&mut actor, &InputState::default(), &registry, dt);
            time += dt;
        }
        time
    };

    let at_30 = flight_time(1.0 / 30.0);
    let at_240 = flight_time(1.0 / 240.0);
    assert_relative_eq!(at_30, at_240, epsilon = 0.1);
}

#[test]
fn walking_off_an_edge_falls_to_the_hard_floor() {
    let registry = plane_at(5.0);
    let controller = ActorController::with_default_config();
    let (mut actor, _) = controller.spawn(&registry, Vec3::new(0.0, 10.0, -48.0), 0.0);
    assert_relative_eq!(actor.position.y, 5.5, epsilon = 1e-4);

    let forward = InputState::default().with(Action::MoveForward);
    for _ in 0..(5.0 / DT) as usize {
        controller.update(&mut actor, &forward, &registry, DT);
    }

    assert!(actor.position.z < -50.0);
    assert_eq!(actor.position.y, controller.config.hard_floor_height);
    assert!(actor.grounded);
}

#[test]
fn holding_jump_off_a_ledge_never_jumps_in_mid_air() {
    let mut registry = plane_at(0.0);
    registry
        .register(SurfaceDesc::terrain(
            SurfaceShape::Cuboid {
                half_extents: Vec3::new(2.0, 1.5, 2.0),
            },
            Vec3::new(0.0, 1.5, 0.0),
        ))
        .unwrap();

    let controller = ActorController::new(LocomotionConfig {
        movement_basis: MovementBasis::CameraRelative,
        ..Default::default()
    })
    .unwrap();
    let (mut actor, _) = controller.spawn(&registry, Vec3::new(0.0, 10.0, 0.0), 0.0);
    assert_relative_eq!(actor.position.y, 3.5, epsilon = 1e-3);

    let dt = 1.0 / 240.0;
    let input = InputState::default()
        .with(Action::MoveForward)
        .with(Action::Jump);

    let mut jumps = 0;
    let mut landed_on_plane = false;
    for frame in 0..(5.0 / dt) as usize {
        let was_grounded = actor.grounded;
        let report = controller.update(&mut actor, &input, &registry, dt);

        if report.integration.jumped {
            assert!(was_grounded, "frame {frame}: jumped in mid-air at y={}", actor.position.y);
            jumps += 1;
        }
        if let GroundContact::Surface { height, .. } = report.contact {
            landed_on_plane |= (height - 0.5).abs() < 1e-3;
        }
    }

    assert!(landed_on_plane);
    assert!((1..=2).contains(&jumps), "jumps={jumps}");
}
