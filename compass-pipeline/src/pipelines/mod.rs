pub mod cost_benchmark;
