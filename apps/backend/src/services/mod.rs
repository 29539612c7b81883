pub mod magic_link;
