use std::fmt;
use std::str::FromStr;

use log::{info, warn};

use crate::chunk::Chunk;
use crate::error::{expect_end, next_token, PolyError, Result};
use crate::tolerance::POLYNOMIAL_EPSILON;

/// A horizontal stack of chunks forming one continuous multi-dof time function.
///
/// `switch_times` holds the cumulative chunk boundaries, starting at 0 and ending at `duration`.
/// The control value p^(degree)(t)/degree! of a dof may jump at a switch time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    degree: usize,
    dof: usize,
    duration: f64,
    switch_times: Vec<f64>,
    chunks: Vec<Chunk>,
}

impl Trajectory {
    /// Returns a trajectory made of `chunks`, played back to back
    ///
    /// # Panics
    ///
    /// Panics if the chunks do not all have the same number of dofs.
    pub fn new(chunks: Vec<Chunk>) -> Trajectory {
        let mut traj = Trajectory::default();
        traj.initialize(chunks);
        traj
    }

    /// Replaces all chunks of this trajectory
    pub fn initialize(&mut self, chunks: Vec<Chunk>) {
        if let Some(first) = chunks.first() {
            let dof = first.dof();
            for (index, chunk) in chunks.iter().enumerate() {
                if chunk.dof() != dof {
                    panic!("{}", PolyError::DofMismatch {
                        index,
                        expected: dof,
                        found: chunk.dof(),
                    });
                }
            }
        }
        self.chunks = chunks;
        self.update_chunks();
        info!(
            "Initialized trajectory with {} chunks over {} s",
            self.chunks.len(),
            self.duration
        );
    }

    /// Recomputes degree, dof, duration and switch times from the chunk sequence
    fn update_chunks(&mut self) {
        self.degree = self.chunks.iter().map(|c| c.degree()).max().unwrap_or(0);
        self.dof = self.chunks.first().map(|c| c.dof()).unwrap_or(0);
        let degree = self.degree;
        for chunk in self.chunks.iter_mut() {
            chunk.pad_degree(degree);
        }

        self.switch_times.clear();
        let mut t = 0.;
        self.switch_times.push(t);
        for chunk in &self.chunks {
            t += chunk.duration();
            self.switch_times.push(t);
        }
        self.duration = t;
    }

    pub fn reset(&mut self) {
        *self = Trajectory::default();
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn dof(&self) -> usize {
        self.dof
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn switch_times(&self) -> &[f64] {
        &self.switch_times
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Applies `f` to chunk `index`, then recomputes degree, duration and switch times
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or if `f` changes the number of dofs of the chunk.
    pub fn modify_chunk<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        let chunk = &mut self.chunks[index];
        let ret = f(chunk);
        if chunk.dof() != self.dof {
            panic!("{}", PolyError::DofMismatch {
                index,
                expected: self.dof,
                found: chunk.dof(),
            });
        }
        self.update_chunks();
        ret
    }

    /// Returns the index of the chunk containing global time `t` and the local time within it.
    ///
    /// Times outside `[0, duration]` are clamped. A time on an internal boundary belongs to the
    /// later chunk. Returns `None` for an empty trajectory.
    ///
    /// # Examples
    ///
    /// ```
    /// use pwpoly::{Chunk, Trajectory};
    /// let chunks = vec![Chunk::constant(&[0.], 1., 3), Chunk::constant(&[0.], 2., 3)];
    /// let traj = Trajectory::new(chunks);
    /// assert_eq!(Some((1, 0.5)), traj.find_chunk_index(1.5));
    /// assert_eq!(Some((1, 2.)), traj.find_chunk_index(3.));
    /// ```
    pub fn find_chunk_index(&self, t: f64) -> Option<(usize, f64)> {
        if self.chunks.is_empty() {
            return None;
        }

        if t < -POLYNOMIAL_EPSILON || t > self.duration + POLYNOMIAL_EPSILON {
            warn!("Time {} is outside of trajectory range [0, {}], clamping", t, self.duration);
        }

        if t <= 0. {
            return Some((0, 0.));
        }
        let last = self.chunks.len() - 1;
        if t >= self.duration {
            return Some((last, self.chunks[last].duration()));
        }

        // first switch time strictly after t, minus one
        let index = (self.switch_times.partition_point(|s| *s <= t) - 1).min(last);
        Some((index, t - self.switch_times[index]))
    }

    /// Returns the `n`-th derivative of every dof at global time `t`
    pub fn evaldn(&self, t: f64, n: usize) -> Option<Vec<f64>> {
        let (index, remainder) = self.find_chunk_index(t)?;
        Some(self.chunks[index].evaldn(remainder, n))
    }

    /// Convenience function to return the position on the trajectory
    pub fn eval(&self, t: f64) -> Option<Vec<f64>> {
        self.evaldn(t, 0)
    }

    /// Convenience function to return the velocity on the trajectory
    pub fn evald1(&self, t: f64) -> Option<Vec<f64>> {
        self.evaldn(t, 1)
    }

    /// Convenience function to return the acceleration on the trajectory
    pub fn evald2(&self, t: f64) -> Option<Vec<f64>> {
        self.evaldn(t, 2)
    }

    /// Convenience function to return the jerk on the trajectory
    pub fn evald3(&self, t: f64) -> Option<Vec<f64>> {
        self.evaldn(t, 3)
    }

    /// Returns `(t, values)` pairs covering the input time range and step
    ///
    /// # Arguments
    ///
    /// `start` - start time
    /// `end` - end time
    /// `step` - time step
    /// `derivative` - derivative order, 0 for position, 1 for velocity, etc.
    ///
    /// # Panics
    ///
    /// Panics if `end <= start` or `step <= 0`, or if the trajectory is empty.
    pub fn sample(
        &self,
        start: f64,
        end: f64,
        step: f64,
        derivative: usize,
    ) -> Vec<(f64, Vec<f64>)> {
        if end <= start {
            panic!("End must not be before start");
        }
        if step <= 0. {
            panic!("Step must be non-zero");
        }

        let mut values = Vec::new();
        let mut t = start;
        loop {
            let value = self
                .evaldn(t, derivative)
                .expect("Cannot sample an empty trajectory");
            values.push((t, value));
            t += step;
            if t > end {
                break;
            }
        }
        values
    }

    /// Replaces the part of the trajectory between `t0` and `t1` with `chunks`.
    ///
    /// Chunks straddling `t0` or `t1` are cut and their outer parts kept. The new chunks are
    /// inserted as given; no continuity patching is done here.
    ///
    /// # Panics
    ///
    /// Panics unless `0 <= t0 <= t1 <= duration` (up to the polynomial tolerance), or if the new
    /// chunks have a different number of dofs.
    pub fn replace_segment(&mut self, t0: f64, t1: f64, chunks: Vec<Chunk>) {
        if t0 < -POLYNOMIAL_EPSILON
            || t1 > self.duration + POLYNOMIAL_EPSILON
            || t0 > t1 + POLYNOMIAL_EPSILON
        {
            panic!(
                "Invalid replacement range [{}, {}] for trajectory of duration {}",
                t0, t1, self.duration
            );
        }
        for (index, chunk) in chunks.iter().enumerate() {
            if !self.chunks.is_empty() && chunk.dof() != self.dof {
                panic!("{}", PolyError::DofMismatch {
                    index,
                    expected: self.dof,
                    found: chunk.dof(),
                });
            }
        }
        let inserted = chunks.len();

        let bounds = self.find_chunk_index(t0).zip(self.find_chunk_index(t1));
        let old = std::mem::take(&mut self.chunks);
        if let Some(((index0, rem0), (index1, rem1))) = bounds {
            let mut new_chunks = Vec::with_capacity(old.len() + inserted + 1);
            let mut tail: Option<Chunk> = None;
            for (index, chunk) in old.into_iter().enumerate() {
                if index < index0 {
                    new_chunks.push(chunk);
                    continue;
                }
                if index == index0 && rem0 > POLYNOMIAL_EPSILON {
                    let mut left = chunk.clone();
                    left.cut(rem0);
                    new_chunks.push(left);
                }
                if index == index0 {
                    new_chunks.extend(chunks.iter().cloned());
                }
                if index == index1 && chunk.duration() - rem1 > POLYNOMIAL_EPSILON {
                    let mut chunk = chunk;
                    tail = Some(chunk.cut(rem1));
                    continue;
                }
                if index > index1 {
                    if let Some(right) = tail.take() {
                        new_chunks.push(right);
                    }
                    new_chunks.push(chunk);
                }
            }
            if let Some(right) = tail.take() {
                new_chunks.push(right);
            }
            self.chunks = new_chunks;
        } else {
            self.chunks = chunks;
        }

        self.update_chunks();
        info!(
            "Replaced segment [{}, {}] with {} chunks, trajectory now has {} chunks over {} s",
            t0,
            t1,
            inserted,
            self.chunks.len(),
            self.duration
        );
    }

    /// Writes the chunk count followed by each chunk
    pub fn serialize<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{}", self.chunks.len())?;
        for chunk in &self.chunks {
            writeln!(out)?;
            chunk.serialize(out)?;
        }
        Ok(())
    }

    pub fn deserialize<'a, I>(tokens: &mut I) -> Result<Trajectory>
    where
        I: Iterator<Item = &'a str>,
    {
        let count: usize = next_token(tokens, "chunk count")?;
        let mut chunks = Vec::new();
        for index in 0..count {
            let chunk = Chunk::deserialize(tokens)?;
            if let Some(first) = chunks.first().map(Chunk::dof) {
                if chunk.dof() != first {
                    return Err(PolyError::DofMismatch {
                        index,
                        expected: first,
                        found: chunk.dof(),
                    });
                }
            }
            chunks.push(chunk);
        }
        Ok(Trajectory::new(chunks))
    }
}

impl FromStr for Trajectory {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Trajectory> {
        let mut tokens = s.split_whitespace();
        let traj = Trajectory::deserialize(&mut tokens)?;
        expect_end(&mut tokens)?;
        Ok(traj)
    }
}
