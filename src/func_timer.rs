/*
 *  func_timer.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Scope timer, logs elapsed time when dropped
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::debug;
use std::time::{Duration, Instant};

pub struct FunctionTimer {
    name: &'static str,
    start: Instant,
}

impl FunctionTimer {
    pub fn new(name: &'static str) -> Self {
        FunctionTimer { name, start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

// Called automatically when the timer goes out of scope.
impl Drop for FunctionTimer {
    fn drop(&mut self) {
        debug!("{} took {:?}", self.name, self.start.elapsed());
    }
}
