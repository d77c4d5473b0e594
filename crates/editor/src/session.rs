//! A running authoring session.
//!
//! The landscape, the per-camera view and the object editor reference each
//! other in every operation, so one owner holds all three and hands out
//! borrows per call. Consumers read the view between calls.

use glam::Vec3;
use terrain::{DelaunayView, Landscape};

use crate::error::EditorResult;
use crate::object_editor::ObjectEditor;

pub struct Session {
    landscape: Landscape,
    view: DelaunayView,
    editor: ObjectEditor,
    camera: Vec3,
    detail_scale: f32,
}

impl Session {
    /// Wrap a generated landscape and an opened editor. The first view is
    /// built immediately so consumers never observe an empty frame.
    pub fn new(landscape: Landscape, editor: ObjectEditor, camera: Vec3) -> EditorResult<Self> {
        let mut session = Self {
            landscape,
            view: DelaunayView::new(),
            editor,
            camera,
            detail_scale: 1.0,
        };
        session
            .editor
            .refresh(&mut session.landscape, &mut session.view, camera, 1.0)?;
        Ok(session)
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn view(&self) -> &DelaunayView {
        &self.view
    }

    pub fn editor(&self) -> &ObjectEditor {
        &self.editor
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn detail_scale(&self) -> f32 {
        self.detail_scale
    }

    /// Move the camera and rebuild the view.
    pub fn move_camera(&mut self, camera: Vec3) {
        self.camera = camera;
        self.view.update(&self.landscape, camera, self.detail_scale);
    }

    /// Change the global detail multiplier and rebuild the view.
    pub fn set_detail_scale(&mut self, detail_scale: f32) {
        self.detail_scale = detail_scale;
        self.view
            .update(&self.landscape, self.camera, detail_scale);
    }

    pub fn place_object(&mut self, pos: Vec3, object_id: u32) -> EditorResult<()> {
        self.editor.place(
            &mut self.landscape,
            &mut self.view,
            self.camera,
            self.detail_scale,
            pos,
            object_id,
        )
    }

    pub fn rotate_object_y(&mut self, pos: Vec3, rot: u32) -> EditorResult<()> {
        self.editor.rotate_y(
            &mut self.landscape,
            &mut self.view,
            self.camera,
            self.detail_scale,
            pos,
            rot,
        )
    }

    pub fn remove_objects(&mut self, pos: Vec3) -> EditorResult<()> {
        self.editor.remove(
            &mut self.landscape,
            &mut self.view,
            self.camera,
            self.detail_scale,
            pos,
        )
    }
}
