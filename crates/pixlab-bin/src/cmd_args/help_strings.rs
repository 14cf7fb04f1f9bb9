pub static THRESHOLD_HELP: &str = "Threshold every colour channel

Takes the threshold, the mode and optionally the value written by
binary modes (default: 255). Values are in the units of the image
depth, 0 to 1 for float images.

Modes:
  binary      src > t ? max : 0
  binary_inv  src > t ? 0 : max
  trunc       src > t ? t : src
  tozero      src > t ? src : 0
  tozero_inv  src > t ? 0 : src

E.g --threshold 127:binary:255";

pub static ADAPTIVE_THRESHOLD_HELP: &str = "Adaptive threshold of an 8 bit grayscale image

Each pixel is compared against the mean of the BLOCK x BLOCK
block around it minus C. METHOD is either mean (default) or gaussian.

E.g --adaptive-threshold 7:7";

pub static MANUAL_HELP: &str = "Convert with the hand written per pixel routine

Input samples are normalized over the whole image and every output
channel is stretched to its full range, so results only match the
reference conversion for images spanning the full range.";

pub static MORPH_HELP: &str = "Morphological operation

OP is one of erode, dilate, open or close, SHAPE one of
rect, ellipse or cross and SIZE the side of the structuring element.

E.g --morph open:ellipse:5:2";

pub static BLEMISH_HELP: &str = "Remove a blemish centred at X,Y

The 8 patches one radius away are scored by their Sobel gradients
and the smoothest is blended over the blemish. RADIUS defaults to 15.";

pub static CHROMA_KEY_HELP: &str = "Chroma keying

Pixels whose chroma is within TOL (default 40) of the key colour
are replaced by --key-background, pixels further than TOL+SOFT
(SOFT defaults to 20) are kept and the ones in between are blended.";

pub static COLORSPACE_HELP: &str = "Set alternative image colorspace

Hue in 8 bit HSV images is stored in half degrees, 0 to 179.
Sixteen bit images only support the rgb family and luma.";
