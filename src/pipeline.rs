pub mod projection;
pub mod renderer;
pub mod shading;
