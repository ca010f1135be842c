// Asset keys understood by the audio/haptic side. The engine never resolves them.

pub const PHASE_GET_READY: &str = "phase_get_ready";
pub const PHASE_POSITION: &str = "phase_position";
pub const PHASE_ECCENTRIC: &str = "phase_eccentric";
pub const PHASE_CONCENTRIC: &str = "phase_concentric";
pub const PHASE_FINAL_ECCENTRIC: &str = "phase_final_eccentric";
pub const PHASE_COMPLETE: &str = "phase_complete";

pub const ENCOURAGEMENT: &[&str] = &[
    "enc_doing_great",
    "enc_keep_going",
    "enc_almost_there",
    "enc_stay_strong",
    "enc_push_through",
    "enc_you_got_this",
    "enc_excellent_form",
    "enc_perfect",
    "enc_fantastic",
    "enc_thats_it",
    "enc_well_done",
    "enc_great_work",
    "enc_one_more",
    "enc_strong_finish",
];

pub const ECCENTRIC: &[&str] = &[
    "ecc_lower_slowly",
    "ecc_control_weight",
    "ecc_nice_slow",
    "ecc_keep_tension",
    "ecc_feel_stretch",
    "ecc_resist",
    "ecc_smooth",
];

pub const CONCENTRIC: &[&str] = &[
    "con_push_now",
    "con_drive_up",
    "con_power",
    "con_squeeze",
    "con_contract",
    "con_strong_push",
    "con_keep_pushing",
];

pub const FINAL_ECCENTRIC: &[&str] = &[
    "final_all_way",
    "final_fight",
    "final_dont_give_up",
    "final_max_tension",
    "final_last_push",
    "final_slow",
    "final_negative",
    "final_control",
];

pub const TIME_30_SEC: &str = "time_30_sec";
pub const TIME_20_SEC: &str = "time_20_sec";
pub const TIME_10_SEC: &str = "time_10_sec";
pub const TIME_5_SEC: &str = "time_5_sec";
pub const TIME_ALMOST: &str = "time_almost";

pub const REST_STARTING: &str = "rest_starting";
pub const REST_BREATHE: &str = "rest_breathe";
pub const REST_NEXT_COMING: &str = "rest_next_coming";
pub const REST_COMPLETE: &str = "rest_complete";

pub const WORKOUT_COMPLETE: &str = "workout_complete";
