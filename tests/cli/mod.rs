mod gc;
mod general;
mod index;
mod session;
mod task;
