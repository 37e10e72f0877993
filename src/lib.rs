/*!
# pwpoly

**pwpoly** represents multi-dof trajectories as sequences of polynomial chunks and checks them
against kinematic limits. Limits are verified analytically, at the ends of every chunk and at the
extrema of each derivative found with a polynomial root solver, so nothing is sampled.

## Features
* polynomials with cached derivatives, local extrema, Taylor re-basing and discretized steps
* quintic and cubic coefficients from boundary position, velocity and acceleration
* chunks of one polynomial per dof, trajectories of chunks with cutting and segment replacement
* position, velocity, acceleration and jerk limit checks plus continuity checks between chunks
* plain-text serialization of polynomials, chunks and trajectories

## Using **pwpoly**
Simply add the following to your `Cargo.toml` file:

```ignore
[dependencies]
pwpoly = "*"
```

and now you can build and check trajectories:

```
use pwpoly::{Chunk, CheckReturn, Limits, PolynomialChecker, State, Trajectory};

fn main() {
    // two rest-to-rest moves of one dof
    let waypoints = [State::new(0., 0., 0.), State::new(1., 0., 0.), State::new(0.5, 0., 0.)];
    let chunks = vec![
        Chunk::from_quintic_boundary(&waypoints[0..1], &waypoints[1..2], 1.),
        Chunk::from_quintic_boundary(&waypoints[1..2], &waypoints[2..3], 0.5),
    ];
    let traj = Trajectory::new(chunks);
    assert_eq!(&[0., 1., 1.5], traj.switch_times());

    // desired position and velocity at any time, perhaps to control a robot
    let t = 0.24;
    let pos = traj.eval(t).unwrap();
    let vel = traj.evald1(t).unwrap();
    println!("Desired position {:?} and velocity {:?} at t = {}", pos, vel, t);

    // the peak velocity of the first move is 1.875
    let mut checker = PolynomialChecker::new(1);
    let limits = Limits::new().with_position(&[-0.1], &[1.1]).with_velocity(&[2.]);
    assert_eq!(CheckReturn::Normal, checker.check_piecewise_trajectory(&traj, &limits));

    let limits = Limits::new().with_velocity(&[1.5]);
    assert_eq!(
        CheckReturn::VelocityLimitsViolation,
        checker.check_piecewise_trajectory(&traj, &limits)
    );
}
```
 */

pub mod boundary;
pub mod checker;
pub mod chunk;
mod error;
pub mod polynomial;
pub mod roots;
pub mod tolerance;
pub mod trajectory;

pub use boundary::State;
pub use checker::{
    CheckFailure, CheckReturn, ChunkExpectation, DofLimits, Limits, PolynomialChecker,
    PolynomialExpectation,
};
pub use chunk::Chunk;
pub use error::{PolyError, Result};
pub use polynomial::{Coordinate, Polynomial};
pub use trajectory::Trajectory;
