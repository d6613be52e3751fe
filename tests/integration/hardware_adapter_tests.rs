//! Integration tests for the hardware adapter over mock embedded-hal
//! peripherals, including one full service run through it.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, I2c, Operation};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

use pomodesk::adapters::hardware::{HardwareAdapter, Inputs};
use pomodesk::adapters::log_sink::LogEventSink;
use pomodesk::app::ports::{ActuatorPort, CardReader, InputPort, Keypad, RequestMode};
use pomodesk::app::service::AppService;
use pomodesk::config::SystemConfig;
use pomodesk::error::{Error, ReaderError, Result};
use pomodesk::fsm::binding::CardUid;
use pomodesk::fsm::mode::{Key, Mode};
use pomodesk::fsm::render::Rgb;
use pomodesk::sensors::presence::PirSensor;
use pomodesk::sensors::{Acceleration, LightSensor, MotionSensor, PresenceSensor};
use pomodesk::timebase::TimeBase;

use crate::mock_hw::STUDY_CARD;

// ── Mock peripherals ──────────────────────────────────────────

type Writes = Rc<RefCell<Vec<(u8, Vec<u8>)>>>;

#[derive(Clone, Default)]
struct Bus {
    writes: Writes,
    fail: Rc<Cell<bool>>,
}

impl I2cErrorType for Bus {
    type Error = ErrorKind;
}

impl I2c for Bus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), ErrorKind> {
        if self.fail.get() {
            return Err(ErrorKind::Bus);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => self.writes.borrow_mut().push((address, bytes.to_vec())),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Pwm {
    duty: Rc<Cell<u16>>,
}

impl PwmErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
        self.duty.set(duty);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Pin {
    high: Rc<Cell<bool>>,
}

impl PinErrorType for Pin {
    type Error = Infallible;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

#[derive(Default)]
struct HeldKey(Option<Key>);

impl Keypad for HeldKey {
    fn read_key(&mut self) -> Option<Key> {
        self.0
    }
}

#[derive(Clone, Default)]
struct Reader {
    card: Rc<Cell<Option<CardUid>>>,
    last_request: Option<RequestMode>,
}

impl CardReader for Reader {
    fn request(&mut self, mode: RequestMode) -> Result<()> {
        self.last_request = Some(mode);
        match self.card.get() {
            Some(_) => Ok(()),
            None => Err(ReaderError::NoCard.into()),
        }
    }

    fn read_uid(&mut self) -> Result<CardUid> {
        self.card.take().ok_or(ReaderError::NoCard.into())
    }
}

struct Still;

impl MotionSensor for Still {
    fn read_acceleration(&mut self) -> Result<Acceleration> {
        Ok(Acceleration::new(0.0, 0.0, 1.0))
    }
}

struct Bright;

impl LightSensor for Bright {
    fn read_lux(&mut self) -> Result<u16> {
        Ok(300)
    }
}

type Adapter = HardwareAdapter<Bus, Pwm, HeldKey, Reader, PirSensor<Pin>, Still, Bright>;

fn inputs(pir: Pin, reader: Reader) -> Inputs<HeldKey, Reader, PirSensor<Pin>, Still, Bright> {
    Inputs {
        keypad: HeldKey::default(),
        reader,
        presence: PirSensor::new(pir, true),
        motion: Still,
        light: Bright,
    }
}

struct Handles {
    bus: Bus,
    pwm: Pwm,
    pir: Pin,
    reader: Reader,
}

fn make() -> (Adapter, Handles) {
    let h = Handles {
        bus: Bus::default(),
        pwm: Pwm::default(),
        pir: Pin::default(),
        reader: Reader::default(),
    };
    h.pir.high.set(true);
    let adapter = HardwareAdapter::new(
        h.bus.clone(),
        h.pwm.clone(),
        inputs(h.pir.clone(), h.reader.clone()),
    )
    .expect("mock peripherals initialise");
    (adapter, h)
}

// ── Bring-up ──────────────────────────────────────────────────

#[test]
fn bring_up_sequence() {
    let (_adapter, h) = make();
    let writes = h.bus.writes.borrow();

    assert_eq!(writes[0], (0x70, vec![0x21]));
    assert_eq!(writes[1], (0x70, vec![0x02, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(writes[2], (0x70, vec![0x81]));
    assert_eq!(writes[3], (0x60, vec![0x00, 0x00]));
    // Three channels, four registers each, all at level 0.
    assert_eq!(writes.len(), 4 + 12);
    assert!(writes[4..].iter().all(|(addr, _)| *addr == 0x60));
    assert_eq!(writes[4], (0x60, vec![0x0A, 0x0F]));
    assert_eq!(h.pwm.duty.get(), 0);
}

#[test]
fn dead_bus_fails_bring_up_with_context() {
    let bus = Bus::default();
    bus.fail.set(true);
    let err = HardwareAdapter::new(bus, Pwm::default(), inputs(Pin::default(), Reader::default()))
        .err()
        .expect("bring-up must fail");
    assert!(err.to_string().contains("0x70"), "{err}");
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::Bus(ErrorKind::Bus))
    );
}

// ── Outputs ───────────────────────────────────────────────────

#[test]
fn text_is_written_as_one_burst() {
    let (mut adapter, h) = make();
    h.bus.writes.borrow_mut().clear();
    adapter.set_text("----");
    assert_eq!(
        *h.bus.writes.borrow(),
        vec![(0x70, vec![0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02])]
    );
}

#[test]
fn indicator_writes_red_channel_first() {
    let (mut adapter, h) = make();
    h.bus.writes.borrow_mut().clear();
    adapter.set_indicator(Rgb::RED);
    let writes = h.bus.writes.borrow();
    assert_eq!(writes.len(), 12);
    // Red is channel 1: off count 0x0F + 100 * 0x10 = 0x64F.
    assert_eq!(writes[2], (0x60, vec![0x0C, 0x4F]));
    assert_eq!(writes[3], (0x60, vec![0x0D, 0x06]));
}

#[test]
fn fan_speed_maps_to_duty() {
    let (mut adapter, h) = make();
    adapter.set_fan_speed(40);
    assert_eq!(h.pwm.duty.get(), 400);
}

#[test]
fn bus_errors_after_bring_up_are_swallowed() {
    let (mut adapter, h) = make();
    h.bus.fail.set(true);
    adapter.set_text("PAUS");
    adapter.set_indicator(Rgb::YELLOW);
}

// ── Inputs ────────────────────────────────────────────────────

#[test]
fn inputs_are_forwarded() {
    let (mut adapter, h) = make();
    assert!(adapter.is_present().unwrap());
    h.pir.high.set(false);
    assert!(!adapter.is_present().unwrap());
    assert_eq!(adapter.read_lux().unwrap(), 300);
    assert_eq!(adapter.read_key(), None);
    assert_eq!(
        adapter.request_card(RequestMode::Idle),
        Err(Error::Reader(ReaderError::NoCard))
    );
}

#[test]
fn release_returns_the_peripherals() {
    let (mut adapter, _h) = make();
    let _ = adapter.request_card(RequestMode::All);
    let (_bus, _pwm, inputs) = adapter.release();
    assert_eq!(inputs.reader.last_request, Some(RequestMode::All));
}

// ── Full service over the adapter ─────────────────────────────

#[test]
fn service_runs_over_real_drivers() {
    let (mut adapter, h) = make();
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = LogEventSink::new();
    let timebase = TimeBase::new();

    app.start(&mut adapter, &mut sink);
    let dashes = (0x70, vec![0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02]);
    assert!(h.bus.writes.borrow().contains(&dashes));

    h.reader.card.set(Some(STUDY_CARD));
    app.run_cycle(&timebase, &mut adapter, &mut sink);
    assert!(matches!(app.mode(), Mode::LoadingProfile { .. }));
    assert_eq!(adapter_last_request(adapter), Some(RequestMode::Idle));
}

fn adapter_last_request(adapter: Adapter) -> Option<RequestMode> {
    adapter.release().2.reader.last_request
}

#[test]
fn presence_pin_pauses_focus() {
    let (mut adapter, h) = make();
    let mut app = AppService::new(SystemConfig::default());
    let mut sink = LogEventSink::new();
    let timebase = TimeBase::new();
    app.start(&mut adapter, &mut sink);

    h.reader.card.set(Some(STUDY_CARD));
    app.run_cycle(&timebase, &mut adapter, &mut sink);
    for _ in 0..2 {
        timebase.on_period_elapsed();
        app.run_cycle(&timebase, &mut adapter, &mut sink);
    }
    assert_eq!(app.mode(), Mode::Focus);
    assert_eq!(h.pwm.duty.get(), 200);

    h.pir.high.set(false);
    app.run_cycle(&timebase, &mut adapter, &mut sink);
    assert_eq!(app.mode(), Mode::Paused);
    assert_eq!(h.pwm.duty.get(), 0);
}
