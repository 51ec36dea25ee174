/// Options fixed when a tool is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicingConfig {
    /// Draw the slicing plane, entrance point and exit point while cutting.
    pub show_plane: bool,
    /// Draw the blade trajectory while cutting.
    pub show_trajectory: bool,
    /// Log cut lifecycle milestones at `info` level.
    pub console_log: bool,
    /// Swing and twist bound of the cut joint, in degrees.
    pub angular_limit_deg: f64,
    /// Marker box half extent per unit of socket scale.
    pub marker_scale: f64,
    /// Length of the exit-point trace along the blade's local +Y.
    pub exit_trace_distance: f64,
    /// Half extent of the boxes marking entrance and exit points.
    pub debug_box_extent: f64,
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self {
            show_plane: false,
            show_trajectory: false,
            console_log: false,
            angular_limit_deg: 45.0,
            marker_scale: 3.5,
            exit_trace_distance: 1000.0,
            debug_box_extent: 3.0,
        }
    }
}
