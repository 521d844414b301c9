use crate::components::orbit_controls::{self, OrbitSignals};
use crate::components::status_panel::{LoadStatus, StatusPanel};
use crate::config::{IndexWidth, ViewerConfig};
#[allow(unused_imports)]
use crate::logging::log;
use crate::pipeline::{load_infrastructure, load_timetable};
use crate::render::{GlIndex, OrbitCamera, RenderContext};
use crate::summary::DataSummary;
use leptos::{
    component, create_node_ref, create_signal, html, spawn_local, view, IntoView, SignalSet,
    WriteSignal,
};
use leptos_use::use_raf_fn;
use std::cell::RefCell;
use std::rc::Rc;

/// Per-session state shared between the loader, input handlers and frame loop
#[derive(Clone)]
struct Scene {
    context: Rc<RefCell<Option<RenderContext>>>,
    camera: Rc<RefCell<OrbitCamera>>,
    set_status: WriteSignal<LoadStatus>,
    set_summary: WriteSignal<Option<DataSummary>>,
}

impl Scene {
    fn fail(&self, err: String) {
        leptos::logging::error!("{err}");
        self.set_status.set(LoadStatus::Failed(err));
    }
}

async fn load_scene<I: GlIndex>(config: ViewerConfig, scene: Scene) {
    let infrastructure = match load_infrastructure::<I>(&config).await {
        Ok(stage) => stage,
        Err(e) => return scene.fail(e),
    };

    let uploaded = scene
        .context
        .borrow_mut()
        .as_mut()
        .map_or(Err("Render context missing".to_string()), |ctx| {
            ctx.add_infrastructure(&infrastructure)
        });
    if let Err(e) = uploaded {
        return scene.fail(e);
    }
    if let Some(bounds) = infrastructure.bounds() {
        scene.camera.borrow_mut().frame_bounds(bounds);
    }
    scene.set_summary.set(Some(infrastructure.summary.clone()));
    scene.set_status.set(LoadStatus::LoadingTimetable);

    let timetable = match load_timetable(&infrastructure, &config).await {
        Ok(stage) => stage,
        Err(e) => return scene.fail(e),
    };

    let uploaded = scene
        .context
        .borrow_mut()
        .as_mut()
        .map_or(Err("Render context missing".to_string()), |ctx| ctx.add_timetable(&timetable));
    if let Err(e) = uploaded {
        return scene.fail(e);
    }
    if let Some(bounds) = scene.context.borrow().as_ref().and_then(RenderContext::bounds) {
        scene.camera.borrow_mut().frame_bounds(bounds);
    }
    scene.set_summary.set(Some(timetable.summary));
    scene.set_status.set(LoadStatus::Ready);
    log!("Scene ready");
}

fn start_session(canvas: web_sys::HtmlCanvasElement, scene: &Scene) {
    let config = match ViewerConfig::from_location() {
        Ok(config) => config,
        Err(e) => return scene.fail(e),
    };

    match RenderContext::new(canvas, &config) {
        Ok(ctx) => *scene.context.borrow_mut() = Some(ctx),
        Err(e) => return scene.fail(e),
    }

    let scene = scene.clone();
    match config.index_width {
        IndexWidth::U16 => spawn_local(load_scene::<u16>(config, scene)),
        IndexWidth::U32 => spawn_local(load_scene::<u32>(config, scene)),
    }
}

#[component]
#[must_use]
pub fn Viewer() -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let (status, set_status) = create_signal(LoadStatus::LoadingInfrastructure);
    let (summary, set_summary) = create_signal(None::<DataSummary>);
    let orbit: OrbitSignals = orbit_controls::create_orbit_signals();

    let scene = Scene {
        context: Rc::new(RefCell::new(None)),
        camera: Rc::new(RefCell::new(OrbitCamera::default())),
        set_status,
        set_summary,
    };

    let mount_scene = scene.clone();
    canvas_ref.on_load(move |canvas| {
        let canvas_elem: &web_sys::HtmlCanvasElement = &canvas;
        start_session(canvas_elem.clone(), &mount_scene);
    });

    let frame_scene = scene.clone();
    let _ = use_raf_fn(move |_| {
        if let Some(ctx) = frame_scene.context.borrow().as_ref() {
            ctx.render(&frame_scene.camera.borrow());
        }
    });

    let move_camera = scene.camera.clone();
    let wheel_camera = scene.camera;

    view! {
        <div class="viewer" style="position: relative; width: 100vw; height: 100vh;">
            <canvas
                node_ref=canvas_ref
                style="display: block; width: 100%; height: 100%;"
                on:mousedown=move |ev| orbit_controls::handle_drag_start(&ev, &orbit)
                on:mousemove=move |ev| {
                    let height = canvas_ref
                        .get_untracked()
                        .map_or(1.0, |c| f64::from(c.client_height()));
                    orbit_controls::handle_drag_move(
                        f64::from(ev.offset_x()),
                        f64::from(ev.offset_y()),
                        height,
                        &orbit,
                        &move_camera,
                    );
                }
                on:mouseup=move |_| orbit_controls::handle_drag_end(&orbit)
                on:mouseleave=move |_| orbit_controls::handle_drag_end(&orbit)
                on:contextmenu=move |ev| ev.prevent_default()
                on:wheel=move |ev| {
                    ev.prevent_default();
                    orbit_controls::handle_zoom(&ev, &wheel_camera);
                }
            />
            <StatusPanel status=status summary=summary />
        </div>
    }
}
