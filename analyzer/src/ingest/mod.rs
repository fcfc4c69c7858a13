pub mod trial_dir;
