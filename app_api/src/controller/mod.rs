pub mod level_controller;
