/// 关键点可见度门限：严格大于此值才视为可靠
pub const VISIBILITY_THRESHOLD: f64 = 0.8;

/// 片段平均膝角低于此值判定为深蹲（度）
pub const SQUAT_KNEE_ANGLE_CUTOFF: f64 = 140.0;

/// 没有任何膝角数据时使用的平均膝角（度），即按站直处理
pub const DEFAULT_MEAN_KNEE_ANGLE: f64 = 180.0;

/// 深蹲背部角度下限（度）
pub const SQUAT_BACK_MIN: f64 = 100.0;

/// 深蹲背部角度上限（度）
pub const SQUAT_BACK_MAX: f64 = 170.0;

/// 深蹲膝角上限，超过视为腿太直（度）
pub const SQUAT_KNEE_MAX: f64 = 160.0;

/// 膝盖超过脚尖的水平容差（归一化坐标）
pub const KNEE_OVER_TOE_MARGIN: f64 = 0.02;

/// 坐姿颈部角度合法区间（度，闭区间）
pub const SITTING_NECK_RANGE: (f64, f64) = (150.0, 185.0);

/// 坐姿背部角度合法区间（度，闭区间）
pub const SITTING_BACK_RANGE: (f64, f64) = (150.0, 185.0);

pub const FLAG_SQUAT_BACK: &str = "Back angle abnormal during squat (<100° or >170°)";
pub const FLAG_SQUAT_KNEE_STRAIGHT: &str = "Knee too straight during squat (>160°)";
pub const FLAG_SQUAT_KNEE_OVER_TOE: &str = "Knee over toe during squat";
pub const FLAG_SITTING_NECK: &str = "Neck not straight while sitting (outside 150°–185°)";
pub const FLAG_SITTING_BACK: &str = "Back not straight while sitting (outside 150°–185°)";

/// 上传临时文件名前缀
pub const TEMP_UPLOAD_PREFIX: &str = "temp_";

/// 上传文件名保留的最大长度（字符）
pub const MAX_UPLOAD_NAME_CHARS: usize = 96;

/// 默认请求体上限：256 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// landmark track 文件头中的格式标识
pub const TRACK_FORMAT: &str = "posture-track";

/// 当前支持的 landmark track 版本
pub const TRACK_VERSION: u32 = 1;
