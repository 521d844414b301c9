use leptos::*;
use leptos_meta::*;
use crate::components::viewer::Viewer;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Railway Space-Time View"/>

        <div class="app" style="margin: 0; overflow: hidden;">
            <Viewer />
        </div>
    }
}
