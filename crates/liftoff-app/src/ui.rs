//! egui control overlay
//!
//! One floating window with the flight controls, camera mode selector, and
//! live readouts. Drawn every frame on top of the 3D scene.

use liftoff_sim::{CameraMode, World};

/// Rolling FPS estimate, refreshed twice a second
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 0.5 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the overlay, mutating the world directly from button clicks
pub fn draw(ctx: &egui::Context, world: &mut World, fps: f32) {
    egui::Window::new("Flight Control")
        .default_pos([16.0, 16.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Launch").clicked() {
                    world.animation.launch();
                }

                let pause_label = if world.animation.paused {
                    "Resume"
                } else {
                    "Pause"
                };
                if ui
                    .add_enabled(world.animation.active, egui::Button::new(pause_label))
                    .clicked()
                {
                    world.animation.toggle_pause();
                }

                if ui.button("Reset").clicked() {
                    world.animation.reset();
                }
            });

            ui.add(
                egui::ProgressBar::new(world.animation.progress())
                    .text(flight_status(world)),
            );

            ui.separator();

            ui.label("Camera");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut world.camera.mode, CameraMode::Free, "Free [1]");
                ui.selectable_value(&mut world.camera.mode, CameraMode::Chase, "Chase [2]");
                ui.selectable_value(&mut world.camera.mode, CameraMode::Ground, "Ground [3]");
            });

            ui.separator();

            ui.label(format!("Particles: {}", world.plume.alive_count()));
            ui.label(format!("FPS: {:.0}", fps));

            ui.separator();
            ui.small("WASD/QE move, Shift fast, Ctrl slow");
            ui.small("Hold right mouse to look, L/P/R launch/pause/reset");
        });
}

fn flight_status(world: &World) -> String {
    if !world.animation.active {
        "Parked".to_string()
    } else if world.animation.is_complete() {
        "Flight complete".to_string()
    } else if world.animation.paused {
        format!("Paused at {:.1}s", world.animation.elapsed)
    } else {
        format!("T+{:.1}s", world.animation.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftoff_core::Vec3;

    #[test]
    fn fps_counter_settles_on_frame_rate() {
        let mut counter = FpsCounter::new();
        for _ in 0..60 {
            counter.update(1.0 / 60.0);
        }
        assert!((counter.fps() - 60.0).abs() < 1.0);
    }

    #[test]
    fn flight_status_tracks_animation_state() {
        let mut world = World::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(flight_status(&world), "Parked");

        world.animation.launch();
        world.animation.elapsed = 2.5;
        assert_eq!(flight_status(&world), "T+2.5s");

        world.animation.toggle_pause();
        assert!(flight_status(&world).starts_with("Paused"));
    }
}
