pub mod dist;
pub mod error;
pub mod net;
pub mod queue;
pub mod run;
pub mod sim;
pub mod sweep;
pub mod topo;

#[cfg(test)]
mod test;
