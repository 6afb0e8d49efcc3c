pub mod random_group;
