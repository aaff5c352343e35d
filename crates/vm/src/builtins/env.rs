//! Process environment: arguments, exit, sleeping and the wall clock.

use crate::checks::{require_depth, require_room};
use crate::error::Halt;
use crate::machine::Vm;
use chrono::{Datelike, Local, Timelike, Utc};
use forthkern_common::{Cell, Fault};
use std::thread;
use std::time::Duration;
use tracing::debug;

impl Vm {
    /// `#ARG` ( -- n )
    pub(crate) fn exec_arg_count(&mut self) -> Result<(), Halt> {
        require_room(&self.data, 1)?;
        self.data.put(self.arg_spans.len() as Cell);
        Ok(())
    }

    /// `ARG` ( n -- c-addr u ): the nth argument as it sits in data space.
    pub(crate) fn exec_arg(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let index = self.data.peek(0);
        let count = self.arg_spans.len();
        let (addr, len) = usize::try_from(index)
            .ok()
            .and_then(|i| self.arg_spans.get(i).copied())
            .ok_or(Fault::UnknownIndex { index, count })?;
        require_room(&self.data, 1)?;
        self.data.poke(0, addr as Cell);
        self.data.put(len as Cell);
        Ok(())
    }

    /// `BYE`: flush and end the session successfully.
    pub(crate) fn exec_bye(&mut self) -> Result<(), Halt> {
        self.flush()?;
        debug!("bye");
        Err(Halt::Bye)
    }

    /// `MS` ( u -- ): block the calling thread for u milliseconds.
    pub(crate) fn exec_ms(&mut self) -> Result<(), Halt> {
        require_depth(&self.data, 1)?;
        let millis = self.data.take();
        thread::sleep(Duration::from_millis(millis));
        Ok(())
    }

    /// `TIME&DATE` ( -- sec min hour day month year ), local time.
    pub(crate) fn exec_time_and_date(&mut self) -> Result<(), Halt> {
        self.push_clock(Local::now())
    }

    /// `UTCTIME&DATE` ( -- sec min hour day month year )
    pub(crate) fn exec_utc_time_and_date(&mut self) -> Result<(), Halt> {
        self.push_clock(Utc::now())
    }

    fn push_clock(&mut self, now: impl Datelike + Timelike) -> Result<(), Halt> {
        require_room(&self.data, 6)?;
        let fields = [
            now.second(),
            now.minute(),
            now.hour(),
            now.day(),
            now.month(),
        ];
        for field in fields {
            self.data.put(Cell::from(field));
        }
        self.data.put(now.year() as Cell);
        Ok(())
    }
}
