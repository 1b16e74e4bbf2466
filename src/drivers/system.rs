// Platform services the core polls: heap headroom, battery, and the
// cooperative suspension point (feeds the watchdog on device).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStatus {
    pub millivolts: u16,
    pub percent: u8,
    pub charging: bool,
}

pub trait System {
    fn free_heap(&self) -> usize;

    fn battery(&self) -> BatteryStatus;

    /// Called periodically from long-running work.
    fn suspend(&mut self);
}
