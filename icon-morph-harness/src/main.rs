use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use lyon_path::math::{Box2D, point, vector};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::info;
use tracing_subscriber::EnvFilter;

use icon_morph::canvas::{BufferCanvas, Canvas, Paint};
use icon_morph::controller::SHAPE_PROGRESS_DURATION;
use icon_morph::drawable::{ColorDrawable, IconContent, ShapeDrawable};
use icon_morph::easing::fast_out_slow_in;
use icon_morph::geometry::lerp;
use icon_morph::rect_anim::RectSpringAnim;
use icon_morph::registry::DEFAULT_PATH_SIZE;
use icon_morph::spring::SpringAnimation;
use icon_morph::{IconShape, LayoutParams, MorphConfig, MorphController, ShapeRegistry};

const DEVICE_WIDTH: f32 = 1080.0;
const DEVICE_HEIGHT: f32 = 1920.0;
const FRAME: Duration = Duration::from_millis(16);

const ICON_PARAMS: LayoutParams = LayoutParams {
    width: 150,
    height: 150,
    margin_start: 120,
    top_margin: 1560,
};

const WALLPAPER: Color = Color::Rgb(24, 26, 38);
const ICON_BACKGROUND: Color = Color::Rgb(66, 133, 244);
const ICON_GLYPH: Color = Color::Rgb(250, 250, 250);

fn main() -> io::Result<()> {
    init_tracing()?;

    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let result = run();

    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

/// Logs go to a file, and only when asked for; the terminal belongs to the
/// demo.
fn init_tracing() -> io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let file = File::create("icon-morph.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}

fn shapes() -> [(&'static str, IconShape); 4] {
    [
        ("circle", IconShape::Circle),
        ("rounded square", IconShape::default()),
        ("tear drop", IconShape::tear_drop(0.3).unwrap_or_default()),
        ("squircle", IconShape::squircle(0.2).unwrap_or_default()),
    ]
}

fn icon_rect() -> Box2D {
    Box2D::new(
        point(ICON_PARAMS.margin_start as f32, ICON_PARAMS.top_margin as f32),
        point(
            (ICON_PARAMS.margin_start + ICON_PARAMS.width) as f32,
            (ICON_PARAMS.top_margin + ICON_PARAMS.height) as f32,
        ),
    )
}

fn window_rect() -> Box2D {
    Box2D::new(point(0.0, 0.0), point(DEVICE_WIDTH, DEVICE_HEIGHT))
}

type SharedIcon = Rc<RefCell<MorphController<SpringAnimation>>>;

struct Transition {
    icon: SharedIcon,
    anim: RectSpringAnim,
}

struct App {
    shape_index: usize,
    registry: Arc<ShapeRegistry>,
    transition: Option<Transition>,
}

impl App {
    fn new() -> Self {
        Self {
            shape_index: 1,
            registry: Arc::new(ShapeRegistry::new(shapes()[1].1)),
            transition: None,
        }
    }

    fn select_shape(&mut self, index: usize) {
        if self.transition.is_some() || index == self.shape_index {
            return;
        }

        self.shape_index = index;
        self.registry = Arc::new(ShapeRegistry::new(shapes()[index].1));
        info!(shape = shapes()[index].0, "shape selected");
    }

    fn build_icon(&self, is_opening: bool) -> SharedIcon {
        let config = MorphConfig {
            aspect_ratio: DEVICE_HEIGHT / DEVICE_WIDTH,
            ..MorphConfig::default()
        };
        let mut icon = MorphController::new(
            Arc::clone(&self.registry),
            config,
            ICON_PARAMS,
            is_opening,
        );

        icon.set_icon(
            IconContent::Layered {
                background: Some(Box::new(ColorDrawable::new(ICON_BACKGROUND))),
                foreground: Some(Box::new(
                    ShapeDrawable::new(IconShape::Circle, ICON_GLYPH).with_inset(40.0),
                )),
            },
            None,
            3,
        );

        Rc::new(RefCell::new(icon))
    }

    /// Window collapses back into the icon.
    fn close(&mut self) {
        if self.transition.is_some() {
            return;
        }

        let icon = self.build_icon(false);
        let target = icon_rect();
        let end_radius = target.width() / 2.0;
        let window_alpha_threshold = 1.0 - SHAPE_PROGRESS_DURATION;

        let mut anim = RectSpringAnim::new(window_rect(), target);
        let listener = Rc::clone(&icon);
        anim.add_on_update_listener(move |rect: Box2D, progress: f32| {
            let corner_radius = lerp(0.0, end_radius, progress);
            listener.borrow_mut().update(
                rect,
                1.0,
                progress,
                window_alpha_threshold,
                corner_radius,
                false,
            );
        });
        anim.start(vector(0.0, -30.0));

        info!("closing transition started");
        self.transition = Some(Transition { icon, anim });
    }

    /// Icon grows into the window.
    fn open(&mut self) {
        if self.transition.is_some() {
            return;
        }

        let icon = self.build_icon(true);
        let start = icon_rect();
        let start_radius = start.width() / 2.0;

        let mut anim = RectSpringAnim::new(start, window_rect());
        let listener = Rc::clone(&icon);
        anim.add_on_update_listener(move |rect: Box2D, progress: f32| {
            let corner_radius = lerp(start_radius, 0.0, fast_out_slow_in(progress));
            listener
                .borrow_mut()
                .update(rect, 1.0, progress, 0.0, corner_radius, true);
        });
        anim.start(vector(0.0, 0.0));

        info!("opening transition started");
        self.transition = Some(Transition { icon, anim });
    }

    fn tick(&mut self, dt: Duration) {
        let Some(transition) = &mut self.transition else {
            return;
        };

        let moving = transition.anim.do_frame(dt);

        let springing = {
            let mut icon = transition.icon.borrow_mut();
            let (x, y) = icon.springs_mut();
            let x_running = x.do_frame(dt);
            let y_running = y.do_frame(dt);
            x_running || y_running
        };

        if !moving && !springing {
            transition.icon.borrow_mut().recycle();
            self.transition = None;
            info!("transition finished");
        }
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(f.area());

        f.render_widget(
            Paragraph::new(format!(
                "icon-morph  [1-4 shape: {}]  [space close]  [o open]  [q quit]",
                shapes()[self.shape_index].0
            ))
            .style(Style::new().fg(Color::DarkGray)),
            chunks[0],
        );

        let stage = chunks[1];
        if stage.width == 0 || stage.height == 0 {
            return;
        }

        let cell_width = DEVICE_WIDTH / stage.width as f32;
        let cell_height = DEVICE_HEIGHT / stage.height as f32;

        let mut canvas = BufferCanvas::new(f.buffer_mut(), cell_width, cell_height);
        canvas.translate(stage.x as f32 * cell_width, stage.y as f32 * cell_height);
        canvas.draw_rect(&window_rect(), &Paint::solid(WALLPAPER));

        match &self.transition {
            Some(transition) => transition.icon.borrow().draw_in_parent(&mut canvas),
            None => self.draw_resting_icon(&mut canvas),
        }
    }

    fn draw_resting_icon(&self, canvas: &mut dyn Canvas) {
        let rect = icon_rect();
        let scale = rect.width() / DEFAULT_PATH_SIZE;

        canvas.save();
        canvas.translate(rect.min.x, rect.min.y);
        canvas.scale(scale, scale);
        canvas.draw_path(self.registry.shape_path(), &Paint::solid(ICON_BACKGROUND));
        canvas.restore();

        let glyph_radius = rect.width() / 2.0 - 40.0;
        let center = rect.center();
        canvas.draw_circle(center.x, center.y, glyph_radius, &Paint::solid(ICON_GLYPH));
    }
}

fn run() -> io::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut app = App::new();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char(' ') | KeyCode::Enter => app.close(),
                        KeyCode::Char('o') => app.open(),
                        KeyCode::Char(c @ '1'..='4') => {
                            app.select_shape(c as usize - '1' as usize);
                        }
                        _ => {}
                    }
                }
            }
        }

        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;
    }

    Ok(())
}
