//! Image assets for the game renderers.
//!
//! Freeway uses a flat set of standalone sprites. Snake additionally slices
//! one sheet into head/straight/tail/turn quadrants and derives the rotated
//! variants, so the sheet is the single asset that pipeline cannot do
//! without: everything else degrades per sprite.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::model::Dir;
use crate::util::{clog, cwarn};

/// Root of the static sprite files, relative to the served page.
pub const ASSETS_BASE: &str = "assets";

/// The four elbow orientations, named by the pair of cell sides they join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnKind {
    UpLeft,
    UpRight,
    DownRight,
    DownLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FreewaySprite {
    Chicken,
    Car1,
    Car2,
    Car3,
    Car4,
    Grey,
    Yellow,
    Grass,
    Target,
    Hit,
    Thinking,
    Idea,
}

impl FreewaySprite {
    pub const ALL: [FreewaySprite; 12] = [
        FreewaySprite::Chicken,
        FreewaySprite::Car1,
        FreewaySprite::Car2,
        FreewaySprite::Car3,
        FreewaySprite::Car4,
        FreewaySprite::Grey,
        FreewaySprite::Yellow,
        FreewaySprite::Grass,
        FreewaySprite::Target,
        FreewaySprite::Hit,
        FreewaySprite::Thinking,
        FreewaySprite::Idea,
    ];

    fn file(self) -> &'static str {
        match self {
            FreewaySprite::Chicken => "chicken.png",
            FreewaySprite::Car1 => "car1.png",
            FreewaySprite::Car2 => "car2.png",
            FreewaySprite::Car3 => "car3.png",
            FreewaySprite::Car4 => "car4.png",
            FreewaySprite::Grey => "grey.png",
            FreewaySprite::Yellow => "yellow.png",
            FreewaySprite::Grass => "grass.png",
            FreewaySprite::Target => "map-pin.png",
            FreewaySprite::Hit => "hit.png",
            FreewaySprite::Thinking => "thinking.png",
            FreewaySprite::Idea => "idea.png",
        }
    }

    pub fn for_car_length(length: u32) -> FreewaySprite {
        match length {
            1 => FreewaySprite::Car1,
            2 => FreewaySprite::Car2,
            3 => FreewaySprite::Car3,
            _ => FreewaySprite::Car4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnakeSprite {
    Apple,
    Obstacle,
    Thinking,
    Idea,
    /// Standalone head icon, used when the snake is a single cell.
    Icon(Dir),
    Head(Dir),
    Tail(Dir),
    StraightV,
    StraightH,
    Turn(TurnKind),
}

/// Sheet-derived variants as (sprite, clockwise quarter turns from the
/// quadrant's base art). Bases: head faces up, tail points left, straight
/// runs vertically, the turn joins the up and left sides.
const HEAD_VARIANTS: [(SnakeSprite, u32); 4] = [
    (SnakeSprite::Head(Dir::Up), 0),
    (SnakeSprite::Head(Dir::Right), 1),
    (SnakeSprite::Head(Dir::Down), 2),
    (SnakeSprite::Head(Dir::Left), 3),
];
const TAIL_VARIANTS: [(SnakeSprite, u32); 4] = [
    (SnakeSprite::Tail(Dir::Left), 0),
    (SnakeSprite::Tail(Dir::Up), 1),
    (SnakeSprite::Tail(Dir::Right), 2),
    (SnakeSprite::Tail(Dir::Down), 3),
];
const STRAIGHT_VARIANTS: [(SnakeSprite, u32); 2] = [
    (SnakeSprite::StraightV, 0),
    (SnakeSprite::StraightH, 1),
];
const TURN_VARIANTS: [(SnakeSprite, u32); 4] = [
    (SnakeSprite::Turn(TurnKind::UpLeft), 0),
    (SnakeSprite::Turn(TurnKind::UpRight), 1),
    (SnakeSprite::Turn(TurnKind::DownRight), 2),
    (SnakeSprite::Turn(TurnKind::DownLeft), 3),
];
/// The standalone head icon's base art faces down.
const ICON_VARIANTS: [(SnakeSprite, u32); 4] = [
    (SnakeSprite::Icon(Dir::Down), 0),
    (SnakeSprite::Icon(Dir::Left), 1),
    (SnakeSprite::Icon(Dir::Up), 2),
    (SnakeSprite::Icon(Dir::Right), 3),
];

/// Shared image cache for one game. `loaded` flips once every requested
/// asset has either resolved or been recorded as failed; renderers must not
/// index individual sprites before that.
pub struct SpriteCache<K> {
    images: HashMap<K, HtmlImageElement>,
    failed: HashSet<K>,
    loaded: bool,
}

pub type FreewayCache = SpriteCache<FreewaySprite>;
pub type SnakeCache = SpriteCache<SnakeSprite>;

impl<K: Copy + Eq + Hash> Default for SpriteCache<K> {
    fn default() -> Self {
        SpriteCache {
            images: HashMap::new(),
            failed: HashSet::new(),
            loaded: false,
        }
    }
}

impl<K: Copy + Eq + Hash> SpriteCache<K> {
    pub fn reset(&mut self) {
        self.images.clear();
        self.failed.clear();
        self.loaded = false;
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    fn insert(&mut self, key: K, img: HtmlImageElement) {
        self.failed.remove(&key);
        self.images.insert(key, img);
    }

    fn mark_failed(&mut self, key: K) {
        self.images.remove(&key);
        self.failed.insert(key);
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Capability check consulted per draw call: present, fully decoded,
    /// non-zero natural size.
    pub fn available(&self, key: K) -> bool {
        self.images
            .get(&key)
            .map(|img| img.complete() && img.natural_width() > 0)
            .unwrap_or(false)
    }

    pub fn get(&self, key: K) -> Option<&HtmlImageElement> {
        if self.available(key) {
            self.images.get(&key)
        } else {
            None
        }
    }
}

/// Loads every freeway sprite; individual failures only cost that sprite.
/// Resolves once all of them have settled and never fails as a whole.
pub async fn preload_freeway(cache: Rc<RefCell<FreewayCache>>) {
    cache.borrow_mut().reset();
    let pending: Vec<_> = FreewaySprite::ALL
        .into_iter()
        .map(|key| {
            let url = format!("{ASSETS_BASE}/freeway/{}", key.file());
            (key, start_load(&url))
        })
        .collect();
    for (key, load) in pending {
        match settle(load).await {
            Some(img) => cache.borrow_mut().insert(key, img),
            None => {
                cwarn(&format!("freeway sprite {key:?} failed to load"));
                cache.borrow_mut().mark_failed(key);
            }
        }
    }
    let mut cache = cache.borrow_mut();
    cache.mark_loaded();
    clog(&format!(
        "freeway sprites ready ({} failed)",
        cache.failed_count()
    ));
}

/// Loads the snake assets. The standalone sprites and the head icon degrade
/// per sprite; the sheet is critical, and without it the cache stays
/// not-loaded so rendering uses the primitive pipeline throughout.
pub async fn preload_snake(cache: Rc<RefCell<SnakeCache>>) {
    cache.borrow_mut().reset();
    let flat = [
        (SnakeSprite::Apple, "apple.png"),
        (SnakeSprite::Obstacle, "brick-wall.png"),
        (SnakeSprite::Thinking, "thinking.png"),
        (SnakeSprite::Idea, "idea.png"),
    ];
    let pending: Vec<_> = flat
        .into_iter()
        .map(|(key, file)| (key, start_load(&format!("{ASSETS_BASE}/snake/{file}"))))
        .collect();
    let icon_load = start_load(&format!("{ASSETS_BASE}/snake/head.png"));
    let sheet_load = start_load(&format!("{ASSETS_BASE}/snake/snake.png"));

    for (key, load) in pending {
        match settle(load).await {
            Some(img) => cache.borrow_mut().insert(key, img),
            None => {
                cwarn(&format!("snake sprite {key:?} failed to load"));
                cache.borrow_mut().mark_failed(key);
            }
        }
    }

    match settle(icon_load).await {
        Some(base) => install_rotations(&cache, &base, &ICON_VARIANTS).await,
        None => {
            cwarn("snake head icon failed to load");
            mark_all(&cache, &ICON_VARIANTS);
        }
    }

    let Some(sheet) = settle(sheet_load).await else {
        cwarn("snake sprite sheet missing; body rendering falls back to primitives");
        mark_all(&cache, &HEAD_VARIANTS);
        mark_all(&cache, &TAIL_VARIANTS);
        mark_all(&cache, &STRAIGHT_VARIANTS);
        mark_all(&cache, &TURN_VARIANTS);
        return;
    };
    let quadrants: [(u32, u32, &[(SnakeSprite, u32)]); 4] = [
        (0, 0, &HEAD_VARIANTS),
        (1, 0, &STRAIGHT_VARIANTS),
        (0, 1, &TAIL_VARIANTS),
        (1, 1, &TURN_VARIANTS),
    ];
    for (col, row, variants) in quadrants {
        match slice_quadrant(&sheet, col, row).await {
            Ok(base) => install_rotations(&cache, &base, variants).await,
            Err(err) => {
                cwarn(&format!("snake sheet quadrant ({col},{row}): {err}"));
                mark_all(&cache, variants);
            }
        }
    }
    let mut cache = cache.borrow_mut();
    cache.mark_loaded();
    clog(&format!(
        "snake sprites ready ({} failed)",
        cache.failed_count()
    ));
}

async fn install_rotations(
    cache: &Rc<RefCell<SnakeCache>>,
    base: &HtmlImageElement,
    variants: &[(SnakeSprite, u32)],
) {
    for (key, quarter_turns) in variants {
        let derived = if *quarter_turns == 0 {
            Ok(base.clone())
        } else {
            rotate_image(base, *quarter_turns).await
        };
        match derived {
            Ok(img) => cache.borrow_mut().insert(*key, img),
            Err(err) => {
                cwarn(&format!("snake sprite {key:?}: {err}"));
                cache.borrow_mut().mark_failed(*key);
            }
        }
    }
}

fn mark_all(cache: &Rc<RefCell<SnakeCache>>, variants: &[(SnakeSprite, u32)]) {
    let mut cache = cache.borrow_mut();
    for (key, _) in variants {
        cache.mark_failed(*key);
    }
}

/// Creates the element and kicks off the request; the returned promise
/// resolves true/false once the image settles either way.
fn start_load(url: &str) -> Result<(HtmlImageElement, js_sys::Promise), String> {
    let img =
        HtmlImageElement::new().map_err(|_| format!("image: element creation failed for {url}"))?;
    let settled = image_settled(&img);
    img.set_src(url);
    Ok((img, settled))
}

fn image_settled(img: &HtmlImageElement) -> js_sys::Promise {
    let img = img.clone();
    js_sys::Promise::new(&mut move |resolve: js_sys::Function, _reject: js_sys::Function| {
        let resolve_ok = resolve.clone();
        let onload = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            let _ = resolve_ok.call1(&JsValue::UNDEFINED, &JsValue::TRUE);
        }) as Box<dyn FnMut(_)>);
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
        let resolve_err = resolve.clone();
        let onerror = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            let _ = resolve_err.call1(&JsValue::UNDEFINED, &JsValue::FALSE);
        }) as Box<dyn FnMut(_)>);
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    })
}

async fn settle(load: Result<(HtmlImageElement, js_sys::Promise), String>) -> Option<HtmlImageElement> {
    let (img, settled) = match load {
        Ok(pair) => pair,
        Err(err) => {
            cwarn(&err);
            return None;
        }
    };
    let outcome = JsFuture::from(settled).await.ok()?;
    if outcome.is_truthy() && img.natural_width() > 0 {
        Some(img)
    } else {
        None
    }
}

fn offscreen_canvas(
    width: u32,
    height: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), String> {
    let document = web_sys::window()
        .ok_or("no window".to_string())?
        .document()
        .ok_or("no document".to_string())?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| "canvas: creation failed".to_string())?
        .dyn_into()
        .map_err(|_| "canvas: cast failed".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .ok_or("canvas: no 2d context".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context cast failed".to_string())?;
    Ok((canvas, ctx))
}

/// Copies one quadrant of the 2x2 sheet onto an offscreen canvas and
/// re-encodes it as an independent image.
async fn slice_quadrant(
    sheet: &HtmlImageElement,
    col: u32,
    row: u32,
) -> Result<HtmlImageElement, String> {
    let qw = (sheet.natural_width() / 2).max(1);
    let qh = (sheet.natural_height() / 2).max(1);
    let (canvas, ctx) = offscreen_canvas(qw, qh)?;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        sheet,
        (col * qw) as f64,
        (row * qh) as f64,
        qw as f64,
        qh as f64,
        0.0,
        0.0,
        qw as f64,
        qh as f64,
    )
    .map_err(|_| "canvas: sheet blit failed".to_string())?;
    reencode(&canvas).await
}

/// Clockwise rotation in quarter turns, re-encoded to a standalone image.
async fn rotate_image(
    img: &HtmlImageElement,
    quarter_turns: u32,
) -> Result<HtmlImageElement, String> {
    let w = img.natural_width().max(1);
    let h = img.natural_height().max(1);
    let (cw, ch) = if quarter_turns % 2 == 1 { (h, w) } else { (w, h) };
    let (canvas, ctx) = offscreen_canvas(cw, ch)?;
    ctx.translate(cw as f64 / 2.0, ch as f64 / 2.0)
        .map_err(|_| "canvas: translate failed".to_string())?;
    ctx.rotate(std::f64::consts::FRAC_PI_2 * quarter_turns as f64)
        .map_err(|_| "canvas: rotate failed".to_string())?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        img,
        -(w as f64) / 2.0,
        -(h as f64) / 2.0,
        w as f64,
        h as f64,
    )
    .map_err(|_| "canvas: rotated blit failed".to_string())?;
    reencode(&canvas).await
}

async fn reencode(canvas: &HtmlCanvasElement) -> Result<HtmlImageElement, String> {
    let url = canvas
        .to_data_url()
        .map_err(|_| "canvas: encoding failed".to_string())?;
    let (img, settled) =
        start_load(&url).map_err(|_| "canvas: re-decode element failed".to_string())?;
    let outcome = JsFuture::from(settled)
        .await
        .map_err(|_| "canvas: re-decode interrupted".to_string())?;
    if outcome.is_truthy() && img.natural_width() > 0 {
        Ok(img)
    } else {
        Err("canvas: re-decode failed".to_string())
    }
}
