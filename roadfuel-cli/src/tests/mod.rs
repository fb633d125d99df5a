//! Shared test harness modules for the roadfuel CLI.

use super::*;

mod helpers;
