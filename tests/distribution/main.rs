#![allow(clippy::cast_precision_loss, clippy::float_cmp)]

mod angular;
mod from_file;
mod gaussian;
mod properties;
mod radius;
mod solid_angle;
mod uniform;
