//! Drawing the field and the ticking backdrop component

use glam::Vec2;
use particle_field::{Bounds, FieldError, ParticleField, Tick};

use crate::{DrawList, DrawSurface, Palette, Theme};

pub const CONNECTION_LINE_WIDTH: f32 = 1.0;

/// Draw one frame of `field` onto `surface`.
///
/// Clears, draws every particle as a disc, then (when the field's config
/// allows it) a line for every connected pair.
pub fn render_field<S: DrawSurface + ?Sized>(field: &ParticleField, surface: &mut S, theme: Theme) {
    let palette = Palette::for_theme(theme);
    let config = field.config();
    let particles = field.particles();

    surface.clear(palette.background);

    let particle_color = palette.particle(config.particle_opacity);
    for particle in particles {
        surface.fill_disc(particle.position, particle.radius, particle_color);
    }

    if !config.draw_connections {
        return;
    }

    for connection in field.connections() {
        surface.stroke_line(
            particles[connection.a].position,
            particles[connection.b].position,
            CONNECTION_LINE_WIDTH,
            palette.connection(connection.opacity),
        );
    }
}

/// The animated background: a field, the theme it is drawn in, and the
/// most recently recorded frame
pub struct Backdrop {
    field: ParticleField,
    theme: Theme,
    frame: DrawList,
}

impl Backdrop {
    pub fn new(field: ParticleField, theme: Theme) -> Self {
        let bounds = field.bounds();
        let mut backdrop = Self {
            field,
            theme,
            frame: DrawList::new(Vec2::new(bounds.width, bounds.height)),
        };
        backdrop.redraw();
        backdrop
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Last recorded frame
    pub fn frame(&self) -> &DrawList {
        &self.frame
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            log::info!("Theme set to {}", theme);
            self.theme = theme;
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn resize(&mut self, bounds: Bounds) -> Result<(), FieldError> {
        self.field.resize(bounds)?;
        self.frame.resize(Vec2::new(bounds.width, bounds.height));
        Ok(())
    }

    /// Re-record the current state without advancing it
    pub fn redraw(&mut self) {
        render_field(&self.field, &mut self.frame, self.theme);
    }
}

impl Tick for Backdrop {
    fn tick(&mut self) {
        self.field.advance_frame();
        self.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DrawCommand};
    use particle_field::{AnimationLoop, DeviceClass, FieldConfig, Particle};

    fn still(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 2.0)
    }

    fn line_field(config: FieldConfig) -> ParticleField {
        // 0-1 at 75 (connected), 1-2 at 150 (not), 0-2 at 225 (not)
        ParticleField::from_particles(
            config,
            Bounds::new(400.0, 100.0),
            vec![still(0.0, 50.0), still(75.0, 50.0), still(225.0, 50.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_render_order_and_counts() {
        let field = line_field(FieldConfig::default());
        let mut list = DrawList::new(Vec2::new(400.0, 100.0));
        render_field(&field, &mut list, Theme::Dark);

        let commands = list.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        assert!(commands[1..4]
            .iter()
            .all(|c| matches!(c, DrawCommand::Disc { .. })));
        assert_eq!(list.disc_count(), 3);
        assert_eq!(list.line_count(), 1);

        let palette = Palette::for_theme(Theme::Dark);
        assert_eq!(
            commands[4],
            DrawCommand::Line {
                from: Vec2::new(0.0, 50.0),
                to: Vec2::new(75.0, 50.0),
                width: CONNECTION_LINE_WIDTH,
                color: palette.connection(0.075),
            }
        );
    }

    #[test]
    fn test_constrained_skips_connections() {
        let config = FieldConfig::for_device_class(DeviceClass::Constrained)
            .with_connection_distance(1000.0);
        let field = line_field(config);
        let mut list = DrawList::new(Vec2::new(400.0, 100.0));
        render_field(&field, &mut list, Theme::Dark);

        assert_eq!(list.disc_count(), 3);
        assert_eq!(list.line_count(), 0);
    }

    #[test]
    fn test_theme_only_changes_colors() {
        let field = line_field(FieldConfig::default());
        let mut light = DrawList::default();
        let mut dark = DrawList::default();
        render_field(&field, &mut light, Theme::Light);
        render_field(&field, &mut dark, Theme::Dark);

        assert_eq!(light.len(), dark.len());
        assert_ne!(light.clear_color(), dark.clear_color());
        let disc_color = |list: &DrawList| -> Option<Color> {
            list.commands().iter().find_map(|c| match c {
                DrawCommand::Disc { color, .. } => Some(*color),
                _ => None,
            })
        };
        assert_eq!(disc_color(&light).map(|c| c.a), Some(0.3));
        assert_ne!(disc_color(&light), disc_color(&dark));
    }

    #[test]
    fn test_backdrop_tick_advances_and_records() {
        let particle = Particle::new(Vec2::new(10.0, 10.0), Vec2::new(0.25, 0.0), 1.0);
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            Bounds::new(100.0, 100.0),
            vec![particle],
        )
        .unwrap();
        let mut animation = AnimationLoop::new(Backdrop::new(field, Theme::Dark));

        animation.step();
        let backdrop = animation.component();
        assert_eq!(backdrop.field().particles()[0].position, Vec2::new(10.25, 10.0));
        assert!(backdrop.frame().commands().contains(&DrawCommand::Disc {
            center: Vec2::new(10.25, 10.0),
            radius: 1.0,
            color: Palette::for_theme(Theme::Dark).particle(0.3),
        }));
    }

    #[test]
    fn test_theme_toggle_redraw_without_advance() {
        let field = line_field(FieldConfig::default());
        let mut backdrop = Backdrop::new(field, Theme::Dark);
        let before = backdrop.field().particles().to_vec();

        assert_eq!(backdrop.toggle_theme(), Theme::Light);
        backdrop.redraw();
        assert_eq!(
            backdrop.frame().clear_color(),
            Some(Palette::for_theme(Theme::Light).background)
        );
        assert_eq!(backdrop.field().particles(), before.as_slice());
    }

    #[test]
    fn test_backdrop_resize() {
        let field = line_field(FieldConfig::default());
        let mut backdrop = Backdrop::new(field, Theme::Dark);

        backdrop.resize(Bounds::new(100.0, 60.0)).unwrap();
        assert_eq!(backdrop.frame().size(), Vec2::new(100.0, 60.0));
        assert_eq!(backdrop.field().particles()[2].position, Vec2::new(100.0, 50.0));

        assert!(backdrop.resize(Bounds::new(0.0, 60.0)).is_err());
        assert_eq!(backdrop.frame().size(), Vec2::new(100.0, 60.0));
    }
}
